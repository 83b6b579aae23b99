use log::warn;

const WORD_SIZE: usize = 4;
const WORDS_PER_LINE: usize = 8;

/// Decodes a binary blob into little-endian 32-bit words.
///
/// SPIR-V is defined as a stream of little-endian words, so a well formed binary is
/// always a multiple of four bytes long. A misaligned blob is tolerated: the trailing
/// partial word is zero-padded, with a warning, and packing proceeds.
pub fn spirv_words(origin: &str, bytes: &[u8]) -> Vec<u32> {
    if bytes.len() % WORD_SIZE != 0 {
        warn!(
            "{} is {} bytes, which is not 4-byte aligned; padding with zeros",
            origin,
            bytes.len()
        );
    }

    bytes
        .chunks(WORD_SIZE)
        .map(|chunk| {
            let mut word = [0_u8; WORD_SIZE];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

/// Renders the C header exposing `bytes` as a `static const unsigned int` array named
/// `symbol`, plus a `<symbol>_size` byte count constant. `origin` is the binary file
/// name quoted in the leading comment.
///
/// The text depends only on the inputs: same blob and symbol, byte-identical header.
pub fn render_header(symbol: &str, origin: &str, bytes: &[u8]) -> String {
    let words = spirv_words(origin, bytes);
    let padded_size = words.len() * WORD_SIZE;

    let mut text = String::new();
    text.push_str(&format!("// Auto-generated from {origin}\n"));
    text.push_str(&format!(
        "// Size: {padded_size} bytes ({} uint32_t values)\n",
        words.len()
    ));
    text.push('\n');
    text.push_str("#pragma once\n");
    text.push('\n');
    text.push_str(&format!("static const unsigned int {symbol}[] = {{\n"));

    let mut lines = words.chunks(WORDS_PER_LINE).peekable();
    while let Some(line) = lines.next() {
        let values = line
            .iter()
            .map(|value| format!("0x{value:08x}"))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str("    ");
        text.push_str(&values);
        if lines.peek().is_some() {
            text.push(',');
        }
        text.push('\n');
    }

    text.push_str("};\n");
    text.push('\n');
    text.push_str(&format!(
        "static const unsigned int {symbol}_size = sizeof({symbol});\n"
    ));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pulls the hex literals back out of the emitted array body and re-encodes them
    /// as the byte sequence they describe.
    fn recovered_bytes(header: &str) -> Vec<u8> {
        let body_start = header.find('{').unwrap();
        let body_end = header.find('}').unwrap();
        header[body_start + 1..body_end]
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| u32::from_str_radix(token.trim_start_matches("0x"), 16).unwrap())
            .flat_map(u32::to_le_bytes)
            .collect()
    }

    #[test]
    fn word_aligned_input_round_trips() {
        let bytes: Vec<u8> = (0_u8..=255).collect();
        let header = render_header("blob_spv", "blob.spv", &bytes);
        assert_eq!(recovered_bytes(&header), bytes);
    }

    #[test]
    fn misaligned_input_is_zero_padded() {
        let bytes = [0xde, 0xad, 0xbe, 0xef, 0x01];
        let header = render_header("blob_spv", "blob.spv", &bytes);

        let recovered = recovered_bytes(&header);
        assert_eq!(recovered.len() % 4, 0);
        assert!(recovered.len() >= bytes.len());
        assert_eq!(&recovered[..bytes.len()], &bytes);
        assert!(recovered[bytes.len()..].iter().all(|byte| *byte == 0));
        assert!(header.contains("// Size: 8 bytes (2 uint32_t values)"));
    }

    #[test]
    fn packing_is_deterministic() {
        let bytes = [7_u8; 20];
        assert_eq!(
            render_header("blob_spv", "blob.spv", &bytes),
            render_header("blob_spv", "blob.spv", &bytes)
        );
    }

    #[test]
    fn single_word_decodes_little_endian() {
        let header = render_header("one_spv", "one.spv", &[0x01, 0x00, 0x00, 0x00]);
        assert!(header.contains("    0x00000001\n"));
        assert_eq!(header.matches("0x").count(), 1);
    }

    #[test]
    fn two_words_share_one_line_without_trailing_comma() {
        let header = render_header("two_spv", "two.spv", &[1, 0, 0, 0, 2, 0, 0, 0]);
        assert!(header.contains("    0x00000001, 0x00000002\n};"));
    }

    #[test]
    fn lines_wrap_after_eight_words() {
        let bytes: Vec<u8> = (0..9_u32).flat_map(u32::to_le_bytes).collect();
        let header = render_header("nine_spv", "nine.spv", &bytes);

        // Eighth word ends the first line with a continuation comma, the ninth stands
        // alone on the last line without one.
        assert!(header.contains("0x00000007,\n"));
        assert!(header.contains("    0x00000008\n};"));
    }

    #[test]
    fn size_constant_is_derived_from_the_symbol() {
        let header = render_header("gradient_frag_spv", "gradient.frag.spv", &[0; 8]);
        assert!(header.contains("static const unsigned int gradient_frag_spv[] = {"));
        assert!(header.contains(
            "static const unsigned int gradient_frag_spv_size = sizeof(gradient_frag_spv);"
        ));
    }

    #[test]
    fn header_names_the_originating_binary() {
        let header = render_header("gradient_frag_spv", "gradient.frag.spv", &[0; 8]);
        assert!(header.starts_with("// Auto-generated from gradient.frag.spv\n"));
    }
}
