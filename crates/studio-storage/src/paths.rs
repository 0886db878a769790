//! Shared path scheme for design-submission files.
//!
//! Layout: `{base}/{challenge_id}/{handle_lowercased}_{user_id}/` holds every
//! generated presentation of a submission; alternate representations are
//! named `{submission_id}_{kind}{ext}` where `kind` is `image`, `imagew`,
//! `preview` or `{image_type_id}_{file_index}`.

use std::path::{Path, PathBuf};

/// Directory holding all generated files of a submitter's submission to a
/// challenge.
pub fn submission_root(base: &Path, challenge_id: i64, user_id: i64, handle: &str) -> PathBuf {
    base.join(challenge_id.to_string())
        .join(format!("{}_{}", handle.to_lowercase(), user_id))
}

/// Path of an alternate representation of `original_file_name`, carrying the
/// original's extension. The directory component is exactly
/// [`submission_root`].
pub fn alternate_file_name(
    base: &Path,
    challenge_id: i64,
    user_id: i64,
    handle: &str,
    submission_id: i64,
    original_file_name: &str,
    kind: &str,
) -> PathBuf {
    let ext = extension_of(original_file_name);
    submission_root(base, challenge_id, user_id, handle)
        .join(format!("{}_{}{}", submission_id, kind, ext))
}

/// Base name of a path or archive entry name. Archive entries always use
/// `/`, uploaded file names may use the platform separator.
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Extension of a file name including the leading dot, or `""` when the
/// base name has none.
pub fn extension_of(file_name_or_path: &str) -> &str {
    let base = file_name(file_name_or_path);
    match base.rfind('.') {
        Some(pos) if pos > 0 => &base[pos..],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_root_lowercases_handle() {
        let root = submission_root(Path::new("subs"), 3001, 124764, "Hung");
        assert_eq!(root, PathBuf::from("subs/3001/hung_124764"));
    }

    #[test]
    fn test_alternate_file_name_layout() {
        let path = alternate_file_name(
            Path::new("subs"),
            3001,
            124764,
            "Hung",
            20001,
            "submission/preview.JPG",
            "25_1",
        );
        assert_eq!(path, PathBuf::from("subs/3001/hung_124764/20001_25_1.JPG"));
    }

    #[test]
    fn test_alternate_file_name_directory_matches_submission_root() {
        let base = Path::new("subs");
        let path = alternate_file_name(base, 3001, 124764, "Hung", 20001, "a/b/image.png", "image");
        assert_eq!(
            path.parent().unwrap(),
            submission_root(base, 3001, 124764, "Hung")
        );
    }

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(file_name("submission/preview.jpg"), "preview.jpg");
        assert_eq!(file_name("a/b/c.png"), "c.png");
        assert_eq!(file_name("nested\\win.png"), "win.png");
        assert_eq!(file_name("plain.gif"), "plain.gif");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("preview.jpg"), ".jpg");
        assert_eq!(extension_of("submission/archive.tar.GZ"), ".GZ");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("dir.v2/noext"), "");
    }
}
