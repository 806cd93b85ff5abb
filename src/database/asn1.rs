//! Minimal DER length inspection for X.509 certificate payloads.
//!
//! The only question the decoder ever asks of a certificate entry is "how
//! long does the outer SEQUENCE claim to be?". That single number is compared
//! against the space the signature list reserves for the entry; a mismatch is
//! reported as a warning but never stops iteration. Full certificate parsing
//! is out of scope.

/// DER tag for a constructed SEQUENCE, the outer element of every X.509
/// certificate.
const TAG_SEQUENCE: u8 = 0x30;

/// Measure the total encoded size of a DER SEQUENCE at the start of `data`.
///
/// Returns the size of the whole element (tag byte, length bytes and
/// content), or `None` if `data` does not begin with a well-formed definite
/// length SEQUENCE or the element would exceed `max` bytes.
///
/// Indefinite lengths (`0x80`) and the reserved length octet (`0xFF`) are
/// rejected, as are length fields wider than the platform `usize`.
#[must_use]
pub(crate) fn der_sequence_length(data: &[u8], max: usize) -> Option<usize> {
    if data.len() < 2 || data[0] != TAG_SEQUENCE {
        return None;
    }

    let first = data[1];
    let (header, content) = if first & 0x80 == 0 {
        // Short form: the length octet is the content length.
        (2_usize, usize::from(first))
    } else {
        let count = usize::from(first & 0x7F);
        // 0x80 is the indefinite form, 0xFF is reserved.
        if count == 0 || first == 0xFF || count > std::mem::size_of::<usize>() {
            return None;
        }
        if data.len() < 2 + count {
            return None;
        }

        let mut content = 0_usize;
        for &byte in &data[2..2 + count] {
            content = (content << 8) | usize::from(byte);
        }
        (2 + count, content)
    };

    let total = header.checked_add(content)?;
    if total > max {
        return None;
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form() {
        let data = [0x30, 0x04, 0x01, 0x02, 0x03, 0x04];
        assert_eq!(der_sequence_length(&data, data.len()), Some(6));
    }

    #[test]
    fn long_form() {
        // 0x82 = two length octets, content length 0x0103 = 259
        let mut data = vec![0x30, 0x82, 0x01, 0x03];
        data.extend(std::iter::repeat(0x00).take(259));
        assert_eq!(der_sequence_length(&data, data.len()), Some(263));
    }

    #[test]
    fn wrong_tag() {
        let data = [0x31, 0x02, 0x00, 0x00];
        assert_eq!(der_sequence_length(&data, data.len()), None);
    }

    #[test]
    fn indefinite_and_reserved_lengths() {
        assert_eq!(der_sequence_length(&[0x30, 0x80, 0x00, 0x00], 4), None);
        assert_eq!(der_sequence_length(&[0x30, 0xFF, 0x00, 0x00], 4), None);
    }

    #[test]
    fn truncated_input() {
        assert_eq!(der_sequence_length(&[0x30], 1), None);
        assert_eq!(der_sequence_length(&[], 0), None);
        // Claims two length octets but only one follows
        assert_eq!(der_sequence_length(&[0x30, 0x82, 0x01], 3), None);
    }

    #[test]
    fn exceeds_budget() {
        // Well-formed six byte element, but only four bytes allowed
        let data = [0x30, 0x04, 0x01, 0x02, 0x03, 0x04];
        assert_eq!(der_sequence_length(&data, 4), None);
    }

    #[test]
    fn oversized_length_field() {
        // More length octets than usize can hold
        let data = [0x30, 0x89, 1, 1, 1, 1, 1, 1, 1, 1, 1];
        assert_eq!(der_sequence_length(&data, data.len()), None);
    }
}
