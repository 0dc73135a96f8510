use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside alphanumerics and `-_.!~*'()` gets percent-encoded,
/// so search-operator syntax like `allintext:"name"` survives transport as
/// a query parameter.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A question in query-string-safe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQuery(String);

impl EncodedQuery {
    pub fn encode(question: &str) -> Self {
        Self(utf8_percent_encode(question, QUERY_COMPONENT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the original question for tagging extracted records.
    pub fn decode(&self) -> String {
        percent_decode_str(&self.0).decode_utf8_lossy().into_owned()
    }
}

impl fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_and_quotes() {
        let encoded = EncodedQuery::encode("hello world");
        assert_eq!(encoded.as_str(), "hello%20world");

        let encoded = EncodedQuery::encode("\"exact phrase\"");
        assert_eq!(encoded.as_str(), "%22exact%20phrase%22");
    }

    #[test]
    fn encodes_operator_syntax() {
        let encoded = EncodedQuery::encode("allintext:\"nathan daeila\"");
        assert_eq!(encoded.as_str(), "allintext%3A%22nathan%20daeila%22");
    }

    #[test]
    fn leaves_unreserved_marks_alone() {
        let encoded = EncodedQuery::encode("it's-a_test.(really!)~*");
        assert_eq!(encoded.as_str(), "it's-a_test.(really!)~*");
    }

    #[test]
    fn decode_round_trips() {
        let question = "allintext:\"nathan daeila\" age & height?";
        assert_eq!(EncodedQuery::encode(question).decode(), question);
    }
}
