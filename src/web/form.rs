//! `application/x-www-form-urlencoded` bodies and query strings.

/// Decoded name/value pairs, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    pub fn parse(encoded: &str) -> Self {
        let fields = encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(name), decode_component(value))
            })
            .collect();
        Self { fields }
    }

    /// Query string of a request URL; empty when there is none.
    pub fn from_query(url: &str) -> Self {
        url.split_once('?')
            .map(|(_, query)| Self::parse(query))
            .unwrap_or_default()
    }

    /// First value submitted for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a form control, empty when it was not submitted (as an
    /// empty input would be).
    pub fn field(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plus_and_percent_escapes() {
        let form = Form::parse("message=What+is+the+dose%3F&date=2024-05-01");
        assert_eq!(form.get("message"), Some("What is the dose?"));
        assert_eq!(form.get("date"), Some("2024-05-01"));
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let form = Form::parse("a=1&flag");
        assert_eq!(form.field("flag"), "");
        assert_eq!(form.field("absent"), "");
        assert_eq!(form.get("absent"), None);
    }

    #[test]
    fn first_value_wins() {
        let form = Form::parse("slot=09%3A00&slot=10%3A00");
        assert_eq!(form.get("slot"), Some("09:00"));
    }

    #[test]
    fn query_string_is_optional() {
        assert_eq!(Form::from_query("/").get("tab"), None);
        assert_eq!(Form::from_query("/?tab=calendar").get("tab"), Some("calendar"));
    }

    #[test]
    fn invalid_utf8_escape_kept_verbatim() {
        assert_eq!(Form::parse("x=%FF").field("x"), "%FF");
    }
}
