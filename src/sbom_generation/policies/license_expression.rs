use std::collections::BTreeSet;

/// Prefix of license identifiers local to one document
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";

/// A parsed SPDX license expression
///
/// Precedence follows SPDX: `WITH` binds tightest, then `AND`, then `OR`.
/// Parentheses group as usual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseExpression {
    License(String),
    With { license: String, exception: String },
    Conjunctive(Vec<LicenseExpression>),
    Disjunctive(Vec<LicenseExpression>),
}

impl LicenseExpression {
    /// Parses an expression, `None` when it is empty or unbalanced
    pub fn parse(expression: &str) -> Option<Self> {
        let spaced = expression.replace('(', " ( ").replace(')', " ) ");
        let mut parser = Parser {
            tokens: spaced.split_whitespace().collect(),
            position: 0,
        };
        let parsed = parser.disjunction()?;
        (parser.position == parser.tokens.len()).then_some(parsed)
    }

    /// Every license identifier the expression mentions; exceptions excluded
    pub fn license_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut BTreeSet<String>) {
        match self {
            LicenseExpression::License(id) | LicenseExpression::With { license: id, .. } => {
                ids.insert(id.clone());
            }
            LicenseExpression::Conjunctive(members) | LicenseExpression::Disjunctive(members) => {
                for member in members {
                    member.collect_ids(ids);
                }
            }
        }
    }
}

struct Parser<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl Parser<'_> {
    fn disjunction(&mut self) -> Option<LicenseExpression> {
        let mut members = vec![self.conjunction()?];
        while self.eat("OR") {
            members.push(self.conjunction()?);
        }
        Some(Self::group(members, LicenseExpression::Disjunctive))
    }

    fn conjunction(&mut self) -> Option<LicenseExpression> {
        let mut members = vec![self.term()?];
        while self.eat("AND") {
            members.push(self.term()?);
        }
        Some(Self::group(members, LicenseExpression::Conjunctive))
    }

    fn term(&mut self) -> Option<LicenseExpression> {
        if self.eat("(") {
            let inner = self.disjunction()?;
            return self.eat(")").then_some(inner);
        }
        let license = self.identifier()?;
        if self.eat("WITH") {
            let exception = self.identifier()?;
            return Some(LicenseExpression::With { license, exception });
        }
        Some(LicenseExpression::License(license))
    }

    fn identifier(&mut self) -> Option<String> {
        let token = *self.tokens.get(self.position)?;
        let reserved = ["(", ")", "AND", "OR", "WITH"]
            .iter()
            .any(|r| token.eq_ignore_ascii_case(r));
        if reserved {
            return None;
        }
        self.position += 1;
        Some(token.to_string())
    }

    fn eat(&mut self, expected: &str) -> bool {
        match self.tokens.get(self.position) {
            Some(token) if token.eq_ignore_ascii_case(expected) => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    fn group(
        mut members: Vec<LicenseExpression>,
        set: fn(Vec<LicenseExpression>) -> LicenseExpression,
    ) -> LicenseExpression {
        if members.len() == 1 {
            members.remove(0)
        } else {
            set(members)
        }
    }
}
