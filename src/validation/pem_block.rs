use pem::Pem;
use thiserror::Error;

const BEGIN_MARKER: &str = "-----BEGIN ";
const END_MARKER: &str = "-----END ";
const DER_SEQUENCE: u8 = 0x30;

/// What a PEM value must contain to be handed to the TLS stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PemKind {
    labels: &'static [&'static str],
    single: bool,
}

impl PemKind {
    /// A root CA bundle, one or more certificates.
    pub const CERTIFICATE_CHAIN: PemKind = PemKind {
        labels: &["CERTIFICATE"],
        single: false,
    };
    pub const CERTIFICATE: PemKind = PemKind {
        labels: &["CERTIFICATE"],
        single: true,
    };
    pub const PRIVATE_KEY: PemKind = PemKind {
        labels: &["RSA PRIVATE KEY", "PRIVATE KEY", "EC PRIVATE KEY"],
        single: true,
    };

    fn expected_labels(&self) -> String {
        self.labels.iter().map(|label| format!("`{}`", label)).collect::<Vec<_>>().join(" or ")
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PemIssue {
    #[error("no PEM block found")]
    Missing,
    #[error("malformed PEM block: {0}")]
    Malformed(String),
    #[error("{begin} BEGIN marker(s) but {end} END marker(s)")]
    UnbalancedMarkers { begin: usize, end: usize },
    #[error("expected a single PEM block, found {0}")]
    TooManyBlocks(usize),
    #[error("unexpected PEM label `{found}`, expected {expected}")]
    UnexpectedLabel { found: String, expected: String },
    #[error("PEM block `{0}` is empty")]
    Empty(String),
    #[error("PEM block `{0}` does not hold DER data")]
    NotDer(String),
}

/// Parses `text` and checks it holds the blocks `kind` asks for.
pub fn inspect(text: &str, kind: PemKind) -> Result<Vec<Pem>, PemIssue> {
    let begin = text.matches(BEGIN_MARKER).count();
    let end = text.matches(END_MARKER).count();
    if begin != end {
        return Err(PemIssue::UnbalancedMarkers { begin, end });
    }
    if begin == 0 {
        return Err(PemIssue::Missing);
    }

    let blocks = pem::parse_many(text).map_err(|e| PemIssue::Malformed(e.to_string()))?;
    // A block the parser skipped is still a block the TLS stack would choke on
    if blocks.len() != begin {
        return Err(PemIssue::Malformed(format!("{} of {} blocks could be parsed", blocks.len(), begin)));
    }
    if kind.single && blocks.len() > 1 {
        return Err(PemIssue::TooManyBlocks(blocks.len()));
    }

    for block in &blocks {
        if !kind.labels.contains(&block.tag()) {
            return Err(PemIssue::UnexpectedLabel {
                found: block.tag().to_string(),
                expected: kind.expected_labels(),
            });
        }
        match block.contents().first() {
            None => return Err(PemIssue::Empty(block.tag().to_string())),
            Some(&DER_SEQUENCE) => {}
            Some(_) => return Err(PemIssue::NotDer(block.tag().to_string())),
        }
    }

    Ok(blocks)
}

/// True when the value holds no content at all, or any of its blocks was left with the
/// template's `-----` body.
pub fn is_unfilled(text: &str) -> bool {
    let mut has_content = false;
    // Some while inside a block, true once that block has a body line
    let mut block_has_content: Option<bool> = None;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with(BEGIN_MARKER) {
            block_has_content = Some(false);
        } else if line.starts_with(END_MARKER) {
            if block_has_content == Some(false) {
                return true;
            }
            block_has_content = None;
        } else if !line.chars().all(|c| c == '-') {
            has_content = true;
            if block_has_content.is_some() {
                block_has_content = Some(true);
            }
        }
    }

    !has_content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEVICE_CERT_PEM, DEVICE_KEY_PEM, Field, ROOT_CA_PEM};
    use rstest::rstest;

    #[test]
    fn accepts_a_certificate() {
        let blocks = inspect(DEVICE_CERT_PEM, PemKind::CERTIFICATE).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tag(), "CERTIFICATE");
    }

    #[test]
    fn accepts_a_ca_bundle() {
        let bundle = format!("{}{}", ROOT_CA_PEM, DEVICE_CERT_PEM);

        let blocks = inspect(&bundle, PemKind::CERTIFICATE_CHAIN).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn accepts_an_rsa_private_key() {
        let blocks = inspect(DEVICE_KEY_PEM, PemKind::PRIVATE_KEY).unwrap();

        assert_eq!(blocks[0].tag(), "RSA PRIVATE KEY");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let padded = format!("\n\n  {}\n", DEVICE_CERT_PEM);

        assert!(inspect(&padded, PemKind::CERTIFICATE).is_ok());
    }

    #[test]
    fn rejects_a_bundle_where_one_certificate_is_expected() {
        let bundle = format!("{}{}", ROOT_CA_PEM, DEVICE_CERT_PEM);

        assert_eq!(inspect(&bundle, PemKind::CERTIFICATE), Err(PemIssue::TooManyBlocks(2)));
    }

    #[test]
    fn rejects_a_key_where_a_certificate_is_expected() {
        let result = inspect(DEVICE_KEY_PEM, PemKind::CERTIFICATE);

        assert_eq!(
            result,
            Err(PemIssue::UnexpectedLabel {
                found: "RSA PRIVATE KEY".to_string(),
                expected: "`CERTIFICATE`".to_string(),
            })
        );
    }

    #[test]
    fn rejects_mismatched_labels() {
        let mismatched = DEVICE_CERT_PEM.replace("-----END CERTIFICATE-----", "-----END PRIVATE KEY-----");

        assert!(inspect(&mismatched, PemKind::CERTIFICATE).is_err());
    }

    #[test]
    fn rejects_a_missing_end_marker() {
        let truncated = DEVICE_CERT_PEM.replace("-----END CERTIFICATE-----", "");

        assert_eq!(
            inspect(&truncated, PemKind::CERTIFICATE),
            Err(PemIssue::UnbalancedMarkers { begin: 1, end: 0 })
        );
    }

    #[test]
    fn rejects_a_body_that_is_not_base64() {
        let corrupted = "-----BEGIN CERTIFICATE-----\nthis is not base64!\n-----END CERTIFICATE-----\n";

        assert!(matches!(inspect(corrupted, PemKind::CERTIFICATE), Err(PemIssue::Malformed(_))));
    }

    #[test]
    fn rejects_content_that_is_not_der() {
        // "hello world" in base64
        let not_der = "-----BEGIN CERTIFICATE-----\naGVsbG8gd29ybGQ=\n-----END CERTIFICATE-----\n";

        assert_eq!(inspect(not_der, PemKind::CERTIFICATE), Err(PemIssue::NotDer("CERTIFICATE".to_string())));
    }

    #[rstest]
    #[case("")]
    #[case("just some text")]
    fn rejects_text_without_blocks(#[case] text: &str) {
        assert_eq!(inspect(text, PemKind::CERTIFICATE), Err(PemIssue::Missing));
    }

    #[rstest]
    #[case(Field::RootCaPem.placeholders()[0], true)]
    #[case(Field::DeviceKeyPem.placeholders()[0], true)]
    #[case("-----BEGIN CERTIFICATE-----\n-----END CERTIFICATE-----", true)]
    #[case("", true)]
    #[case(DEVICE_CERT_PEM, false)]
    #[case(DEVICE_KEY_PEM, false)]
    #[case(&format!("{}{}", ROOT_CA_PEM, Field::RootCaPem.placeholders()[0]), true)]
    #[case(&format!("{}{}", Field::RootCaPem.placeholders()[0], ROOT_CA_PEM), true)]
    #[case(&format!("{}{}", ROOT_CA_PEM, DEVICE_CERT_PEM), false)]
    fn detects_unfilled_blocks(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_unfilled(text), expected);
    }
}
