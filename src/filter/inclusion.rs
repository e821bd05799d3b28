//! Inclusion rules evaluated against fully-qualified names

use regex::Regex;

/// Decides whether a fully-qualified name belongs in the catalog
#[derive(Debug, Clone, Default)]
pub enum InclusionRule {
    /// Everything matches
    #[default]
    IncludeAll,
    /// Regex include pattern, with an optional exclude pattern that wins
    /// over the include
    Pattern {
        include: Regex,
        exclude: Option<Regex>,
    },
    /// Everything matches except the listed names
    ExcludeNames(Vec<String>),
}

impl InclusionRule {
    pub fn pattern(include: &str, exclude: Option<&str>) -> Result<Self, regex::Error> {
        Ok(InclusionRule::Pattern {
            include: Regex::new(include)?,
            exclude: exclude.map(Regex::new).transpose()?,
        })
    }

    pub fn exclude_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InclusionRule::ExcludeNames(names.into_iter().map(Into::into).collect())
    }

    /// Tests a fully-qualified name. Regex patterns must match the whole
    /// name, not a substring.
    pub fn test(&self, full_name: &str) -> bool {
        match self {
            InclusionRule::IncludeAll => true,
            InclusionRule::Pattern { include, exclude } => {
                if !matches_fully(include, full_name) {
                    return false;
                }
                match exclude {
                    Some(exclude) => !matches_fully(exclude, full_name),
                    None => true,
                }
            }
            InclusionRule::ExcludeNames(names) => !names.iter().any(|name| name == full_name),
        }
    }

    /// The raw include pattern of a regex rule, substituted verbatim into
    /// schema-scoped query templates.
    pub fn inclusion_pattern(&self) -> Option<&str> {
        match self {
            InclusionRule::Pattern { include, .. } => Some(include.as_str()),
            _ => None,
        }
    }
}

fn matches_fully(pattern: &Regex, name: &str) -> bool {
    pattern
        .find(name)
        .is_some_and(|m| m.start() == 0 && m.end() == name.len())
}
