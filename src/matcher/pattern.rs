use crate::error::Error;
use chrono::NaiveDate;
use regex::Regex;
use std::fmt;

/// Meaning of one placeholder run inside a date format such as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    /// `YY`, read as 2000 + value.
    ShortYear,
    Month,
    Day,
    /// A placeholder run that is digits only, e.g. `MMMM`.
    Digits(usize),
}

impl DateField {
    fn width(self) -> usize {
        match self {
            DateField::Year => 4,
            DateField::ShortYear | DateField::Month | DateField::Day => 2,
            DateField::Digits(width) => width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(DateField),
}

/// A compiled filename predicate for one (suffix, date format) pair.
///
/// Accepts names ending in `<date><suffix>` or `<suffix><date>`, compared
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct MatchRule {
    suffix: String,
    suffix_lower: String,
    date_format: String,
    fields: Vec<DateField>,
    regex: Regex,
}

impl MatchRule {
    pub fn synthesize(suffix: &str, date_format: &str) -> Result<MatchRule, Error> {
        if suffix.is_empty() {
            return Err(Error::EmptyPattern {
                suffix: suffix.to_string(),
                date_format: date_format.to_string(),
                reason: "suffix is empty",
            });
        }
        if date_format.trim().is_empty() {
            return Err(Error::EmptyPattern {
                suffix: suffix.to_string(),
                date_format: date_format.to_string(),
                reason: "date format is empty",
            });
        }

        let segments = tokenize(date_format);
        let fields: Vec<DateField> = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Field(field) => Some(*field),
                Segment::Literal(_) => None,
            })
            .collect();

        let date_part = render(&segments);
        let suffix_part = regex::escape(suffix);
        let pattern = format!("(?i)(?:{date_part}{suffix_part}|{suffix_part}{date_part})$");

        let regex = Regex::new(&pattern).map_err(|source| Error::Pattern {
            suffix: suffix.to_string(),
            date_format: date_format.to_string(),
            source,
        })?;

        Ok(MatchRule {
            suffix: suffix.to_string(),
            suffix_lower: suffix.to_lowercase(),
            date_format: date_format.to_string(),
            fields,
            regex,
        })
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Cheap check run before the full rule: the suffix appears somewhere in the name.
    pub fn prefilter(&self, file_name: &str) -> bool {
        file_name.to_lowercase().contains(&self.suffix_lower)
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// The calendar date embedded in a matching file name, if the format
    /// carries a year and the digits form a valid date.
    pub fn embedded_date(&self, file_name: &str) -> Option<NaiveDate> {
        if self.fields.is_empty() {
            return None;
        }
        let caps = self.regex.captures(file_name)?;

        // Both alternatives carry the same groups; the second set starts after the first.
        let offset = if caps.get(1).is_some() {
            0
        } else {
            self.fields.len()
        };

        let mut year = None;
        let mut month = None;
        let mut day = None;
        for (idx, field) in self.fields.iter().enumerate() {
            let digits = caps.get(offset + idx + 1)?.as_str();
            match field {
                DateField::Year => year = digits.parse::<i32>().ok(),
                DateField::ShortYear => year = digits.parse::<i32>().ok().map(|y| 2000 + y),
                DateField::Month => month = digits.parse::<u32>().ok(),
                DateField::Day => day = digits.parse::<u32>().ok(),
                DateField::Digits(_) => {}
            }
        }

        NaiveDate::from_ymd_opt(year?, month.unwrap_or(1), day.unwrap_or(1))
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.regex.as_str())
    }
}

fn placeholder(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        l @ ('y' | 'm' | 'd') => Some(l),
        _ => None,
    }
}

fn tokenize(date_format: &str) -> Vec<Segment> {
    let chars: Vec<char> = date_format.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let Some(letter) = placeholder(chars[i]) else {
            literal.push(chars[i]);
            i += 1;
            continue;
        };

        let run = chars[i..]
            .iter()
            .take_while(|c| c.to_ascii_lowercase() == letter)
            .count();

        let field = match (letter, run) {
            ('y', 4) => Some(DateField::Year),
            ('y', 2) => Some(DateField::ShortYear),
            ('m', 2) => Some(DateField::Month),
            ('d', 2) => Some(DateField::Day),
            (_, 4) | (_, 2) => Some(DateField::Digits(run)),
            _ => None,
        };

        match field {
            Some(field) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field));
            }
            None => literal.extend(&chars[i..i + run]),
        }
        i += run;
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => regex::escape(text),
            Segment::Field(field) => format!("([0-9]{{{}}})", field.width()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_date_before_and_after_suffix() {
        let rule = MatchRule::synthesize(".log", "YYYY-MM-DD").unwrap();
        assert!(rule.is_match("app-2023-01-15.log"));
        assert!(rule.is_match("app.log2023-01-15"));
        assert!(rule.is_match("2023-01-15.log"));

        let rule = MatchRule::synthesize(".log.", "YYYY-MM-DD").unwrap();
        assert!(rule.is_match("catalina.log.2023-01-15"));
    }

    #[test]
    fn test_rejects_non_digit_in_digit_position() {
        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        assert!(!rule.is_match("app-2023O101.log"));
        assert!(!rule.is_match("app.log.202301x1"));
        assert!(!rule.is_match("app.log"));
    }

    #[test]
    fn test_requires_trailing_anchor() {
        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        assert!(!rule.is_match("app-20230101.log.gz"));
        assert!(!rule.is_match("app.log.20230101.bak"));
    }

    #[test]
    fn test_suffix_and_placeholders_are_case_insensitive() {
        let rule = MatchRule::synthesize(".LOG", "yyyymmdd").unwrap();
        assert!(rule.is_match("catalina.20230101.log"));
        assert!(rule.prefilter("CATALINA.20230101.Log"));
        assert!(rule.is_match("CATALINA.20230101.Log"));
    }

    #[test]
    fn test_same_length_runs_share_digit_class() {
        let rule = MatchRule::synthesize(".txt", "MM_DD").unwrap();
        assert!(rule.is_match("report-12_31.txt"));
        assert!(rule.is_match("report-99_99.txt"));
        assert!(!rule.is_match("report-1_31.txt"));
    }

    #[test]
    fn test_unrecognized_tokens_are_literal() {
        let rule = MatchRule::synthesize(".log", "YYYY.MM.DD").unwrap();
        assert!(rule.is_match("app-2023.01.02.log"));
        assert!(!rule.is_match("app-2023x01x02.log"));

        let rule = MatchRule::synthesize(".log", "dYYYYw").unwrap();
        assert!(rule.is_match("app-d2023w.log"));
        assert!(!rule.is_match("app-12023w.log"));
    }

    #[test]
    fn test_suffix_dot_is_literal() {
        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        assert!(!rule.is_match("app-20230101xlog"));
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        assert!(matches!(
            MatchRule::synthesize("", "YYYYMMDD"),
            Err(Error::EmptyPattern { .. })
        ));
        assert!(matches!(
            MatchRule::synthesize(".log", "  "),
            Err(Error::EmptyPattern { .. })
        ));
    }

    #[test]
    fn test_oversized_rule_is_compile_error() {
        let format = "YYYY-".repeat(200_000);
        let err = MatchRule::synthesize(".log", &format).unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }

    #[test]
    fn test_embedded_date_in_either_position() {
        let rule = MatchRule::synthesize(".log", "DD-MM-YYYY").unwrap();
        assert_eq!(
            rule.embedded_date("app-31-12-2022.log"),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
        assert_eq!(
            rule.embedded_date("app.log01-02-2023"),
            NaiveDate::from_ymd_opt(2023, 2, 1)
        );
    }

    #[test]
    fn test_embedded_date_rejects_impossible_dates() {
        let rule = MatchRule::synthesize(".log", "YYYYMMDD").unwrap();
        assert_eq!(rule.embedded_date("app-20231345.log"), None);
        assert_eq!(rule.embedded_date("unrelated.txt"), None);
    }

    #[test]
    fn test_embedded_date_defaults_missing_day() {
        let rule = MatchRule::synthesize(".log", "YY-MM").unwrap();
        assert_eq!(
            rule.embedded_date("app-23-04.log"),
            NaiveDate::from_ymd_opt(2023, 4, 1)
        );
    }
}
