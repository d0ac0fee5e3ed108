//! 字符串转义
//!
//! 快速路径：一次扫描未发现 `"`、`\` 或控制字符时原样借用，不做拷贝。
//! 慢速路径：逐字符重建，写出两字符转义或 `\uXXXX`。

use std::borrow::Cow;

/// 判断字符串是否需要转义
///
/// 只检查 `"`、`\` 与 U+0020 以下的控制字符。UTF-8 多字节序列的每个字节都不小于
/// 0x80，所以按字节扫描即可。
pub fn needs_escaping(text: &str) -> bool {
    text.bytes()
        .any(|b| b == b'"' || b == b'\\' || b < b' ')
}

/// 转义字符串内容（不含两侧引号）
///
/// # Brief
/// 无需转义时返回借用的原字符串；否则返回重建后的字符串。
/// 慢速路径中 `/` 也会被转义为 `\/`。
///
/// # Arguments
/// * `text` - 原始字符串
///
/// # Returns
/// 转义后的 UTF-8 字符串
pub fn escape(text: &str) -> Cow<'_, str> {
    if !needs_escaping(text) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '/' => out.push_str("\\/"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < ' ' => push_unicode_escape(&mut out, c),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn push_unicode_escape(out: &mut String, c: char) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let code = c as u32;
    out.push_str("\\u");
    for shift in [12u32, 8, 4, 0] {
        out.push(HEX[((code >> shift) & 0xF) as usize] as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_string_is_borrowed() {
        let escaped = escape("hello, wörld");
        assert!(matches!(escaped, Cow::Borrowed(_)));
        assert_eq!(escaped, "hello, wörld");
    }

    #[test]
    fn test_slash_alone_stays_unescaped() {
        assert!(matches!(escape("a/b"), Cow::Borrowed("a/b")));
    }

    #[test]
    fn test_quote_and_newline() {
        assert_eq!(escape("a\"b\nc"), "a\\\"b\\nc");
    }

    #[test]
    fn test_two_character_escapes() {
        assert_eq!(
            escape("\\ / \u{8} \u{c} \n \r \t"),
            "\\\\ \\/ \\b \\f \\n \\r \\t"
        );
    }

    #[test]
    fn test_control_characters_use_uppercase_hex() {
        assert_eq!(escape("\u{0}"), "\\u0000");
        assert_eq!(escape("x\u{1f}y"), "x\\u001Fy");
        assert_eq!(escape("\u{b}"), "\\u000B");
    }

    #[test]
    fn test_non_ascii_preserved_on_slow_path() {
        assert_eq!(escape("日本\t語"), "日本\\t語");
    }

    #[test]
    fn test_needs_escaping() {
        assert!(!needs_escaping(""));
        assert!(!needs_escaping("plain text"));
        assert!(needs_escaping("tab\there"));
        assert!(needs_escaping("back\\slash"));
        assert!(needs_escaping("\u{7}"));
    }
}
