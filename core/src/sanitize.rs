// Filename sanitizing for uploaded files

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduces a client-supplied filename to a safe, flat ASCII name.
///
/// Path separators become spaces, whitespace runs become `_`, anything other
/// than `[A-Za-z0-9._-]` (control characters included) is dropped and leading
/// or trailing `.`/`_` are trimmed, so `../../etc/passwd` ends up as
/// `etc_passwd`. Reserved Windows device names get a `_` prefix. The result
/// can be empty.
pub fn secure_filename(name: &str) -> String {
    let flattened: String = name
        .chars()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_').to_string();

    let stem = trimmed.split('.').next().unwrap_or("");
    if !trimmed.is_empty() && WINDOWS_DEVICE_NAMES.iter().any(|d| d.eq_ignore_ascii_case(stem)) {
        return format!("_{}", trimmed);
    }

    trimmed
}

/// Lowercased extension of `filename` including the leading dot, or an empty
/// string. A leading dot alone (".bashrc") does not count.
pub fn extension_of(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem_len = base.len() - base.trim_start_matches('.').len();

    match base[stem_len..].rfind('.') {
        Some(idx) => base[stem_len + idx..].to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(secure_filename("evil.exe"), "evil.exe");
        assert_eq!(secure_filename("my-notes_v2.txt"), "my-notes_v2.txt");
    }

    #[test]
    fn path_traversal_is_flattened() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Windows\\evil.dll"), "C_Windows_evil.dll");
    }

    #[test]
    fn whitespace_and_control_chars() {
        assert_eq!(secure_filename("my cool   file.txt"), "my_cool_file.txt");
        assert_eq!(secure_filename("bad\u{0}name\u{7}.bat"), "badname.bat");
        assert_eq!(secure_filename("line\nbreak.js"), "line_break.js");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(secure_filename("résumé.pdf"), "rsum.pdf");
    }

    #[test]
    fn degenerate_names_become_empty() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename("../.."), "");
        assert_eq!(secure_filename("ßßß"), "");
    }

    #[test]
    fn windows_device_names_are_prefixed() {
        assert_eq!(secure_filename("NUL"), "_NUL");
        assert_eq!(secure_filename("con.txt"), "_con.txt");
        assert_eq!(secure_filename("console.txt"), "console.txt");
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(extension_of("evil.EXE"), ".exe");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("..hidden.ps1"), ".ps1");
        assert_eq!(extension_of("dir.d/file"), "");
    }
}
