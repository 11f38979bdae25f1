//! Printable armor for envelope bytes.
//!
//! Every byte maps to one codepoint in the Braille Patterns block (U+2800..=U+28FF), so any
//! envelope survives plain-text storage. Decoding ignores everything outside that block, which
//! lets armored text carry its own delimiters, whitespace, or line breaks.

use tracing::trace;

/// First codepoint of the armor block. Byte `b` armors to `ARMOR_BASE + b`.
pub const ARMOR_BASE: u32 = 0x2800;

/// Opens an armored line.
pub const LINE_OPEN: &str = "⧈ΩϞ⧉";
/// Closes an armored line.
pub const LINE_CLOSE: &str = "⧉ϞΩ⧈";
/// Marks the start and end of the armored payload within a line.
pub const BULLET: char = '•';

const LINE_TAG: &str = " GNGM:";
const PAYLOAD_OPEN: &str = " •";

/// Map each byte to its armor character.
pub fn to_armor(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| char::from_u32(ARMOR_BASE + b as u32).unwrap_or('\u{2800}'))
        .collect()
}

/// Recover bytes from armored text, silently skipping any character outside the armor block.
pub fn from_armor(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| {
            let v = c as u32;
            if (ARMOR_BASE..=ARMOR_BASE + 0xFF).contains(&v) {
                Some((v - ARMOR_BASE) as u8)
            } else {
                None
            }
        })
        .collect()
}

/// Produce the single-line armored form of an envelope under a title.
pub fn armor_line(title: &str, envelope: &[u8]) -> String {
    let armor = to_armor(envelope);
    let mut line = String::with_capacity(armor.len() + title.len() + 32);
    line.push_str(LINE_OPEN);
    line.push_str(LINE_TAG);
    line.push_str(title);
    line.push(' ');
    line.push(BULLET);
    line.push_str(&armor);
    line.push(BULLET);
    line.push(' ');
    line.push_str(LINE_CLOSE);
    line
}

/// Extract the envelope bytes from an armored line.
///
/// The header, everything up to the first `" •"` after the `GNGM:` tag, is dropped, so armor
/// characters in the title are ignored. The rest of the line is unarmored whole: bullets,
/// trailing notes, and other decoration are skipped like any non-armor text. Titles therefore
/// must not contain `" •"`. A line without the header is unarmored whole.
pub fn unarmor_line(line: &str) -> Vec<u8> {
    let payload = line
        .find(LINE_TAG)
        .and_then(|tag| {
            let rest = &line[tag + LINE_TAG.len()..];
            let open = rest.find(PAYLOAD_OPEN)?;
            Some(&rest[open + PAYLOAD_OPEN.len()..])
        })
        .unwrap_or(line);
    let bytes = from_armor(payload);
    trace!(chars = payload.chars().count(), bytes = bytes.len(), "unarmored line");
    bytes
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn every_byte() {
        let bytes: Vec<u8> = (0..=255).collect();
        let armor = to_armor(&bytes);
        assert_eq!(armor.chars().count(), 256);
        assert_eq!(armor.chars().next(), Some('\u{2800}'));
        assert_eq!(armor.chars().last(), Some('\u{28FF}'));
        assert_eq!(from_armor(&armor), bytes);
    }

    #[test]
    fn noise_is_skipped() {
        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..512).map(|_| rng.gen()).collect();
        let mut noisy = String::new();
        for c in to_armor(&bytes).chars() {
            noisy.push(c);
            match rng.gen_range(0..4) {
                0 => noisy.push(' '),
                1 => noisy.push('\n'),
                2 => noisy.push('\u{27FF}'),
                _ => noisy.push('\u{2900}'),
            }
        }
        assert_eq!(from_armor(&noisy), bytes);
    }

    #[test]
    fn empty() {
        assert_eq!(to_armor(&[]), "");
        assert!(from_armor("no armor here").is_empty());
    }

    #[test]
    fn line_layout() {
        let line = armor_line("entropy", &[0, 1, 255]);
        assert_eq!(line, "⧈ΩϞ⧉ GNGM:entropy •\u{2800}\u{2801}\u{28FF}• ⧉ϞΩ⧈");
        assert_eq!(unarmor_line(&line), vec![0, 1, 255]);
    }

    #[test]
    fn title_with_armor() {
        let title = "a•b \u{2842} c";
        let line = armor_line(title, &[9, 8, 7]);
        assert_eq!(unarmor_line(&line), vec![9, 8, 7]);
    }

    #[test]
    fn trailing_note() {
        let line = armor_line("t", &[4, 5, 6]);
        assert_eq!(unarmor_line(&format!("{} • saved", line)), vec![4, 5, 6]);
        assert_eq!(unarmor_line(&format!("{}\n", line)), vec![4, 5, 6]);
    }

    #[test]
    fn bullets_in_payload() {
        let armor = to_armor(&[1, 2, 3, 4]);
        let mut split: Vec<char> = armor.chars().collect();
        split.insert(2, BULLET);
        split.insert(1, BULLET);
        let payload: String = split.into_iter().collect();
        let line = format!("{} GNGM:t •{}• {}", LINE_OPEN, payload, LINE_CLOSE);
        assert_eq!(unarmor_line(&line), vec![1, 2, 3, 4]);
    }

    #[test]
    fn bare_armor_fallback() {
        let armor = to_armor(&[1, 2, 3]);
        assert_eq!(unarmor_line(&armor), vec![1, 2, 3]);
        let one_bullet = format!("x • {}", armor);
        assert_eq!(unarmor_line(&one_bullet), vec![1, 2, 3]);
    }
}
