//! Join kinds and their rendered keywords.

use core::fmt::{self, Display};

/// The kind of a join, with a fixed rendered keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub enum JoinType {
    /// `,`
    Comma,
    /// `JOIN`
    #[default]
    Join,
    /// `INNER JOIN`
    InnerJoin,
    /// `CROSS JOIN`
    CrossJoin,
    /// `NATURAL JOIN`
    NaturalJoin,
    /// `NATURAL INNER JOIN`
    NaturalInnerJoin,
    /// `LEFT JOIN`
    LeftOuterJoin,
    /// `RIGHT JOIN`
    RightOuterJoin,
    /// `FULL JOIN`
    FullOuterJoin,
    /// `STRAIGHT_JOIN`
    StraightJoin,
    /// `OUTER APPLY`
    OuterApply,
    /// `CROSS APPLY`
    CrossApply,
}

impl JoinType {
    /// Every join kind, in declaration order.
    pub const ALL: [JoinType; 12] = [
        Self::Comma,
        Self::Join,
        Self::InnerJoin,
        Self::CrossJoin,
        Self::NaturalJoin,
        Self::NaturalInnerJoin,
        Self::LeftOuterJoin,
        Self::RightOuterJoin,
        Self::FullOuterJoin,
        Self::StraightJoin,
        Self::OuterApply,
        Self::CrossApply,
    ];

    /// The keyword rendered between the two sides.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Join => "JOIN",
            Self::InnerJoin => "INNER JOIN",
            Self::CrossJoin => "CROSS JOIN",
            Self::NaturalJoin => "NATURAL JOIN",
            Self::NaturalInnerJoin => "NATURAL INNER JOIN",
            Self::LeftOuterJoin => "LEFT JOIN",
            Self::RightOuterJoin => "RIGHT JOIN",
            Self::FullOuterJoin => "FULL JOIN",
            Self::StraightJoin => "STRAIGHT_JOIN",
            Self::OuterApply => "OUTER APPLY",
            Self::CrossApply => "CROSS APPLY",
        }
    }

    /// The keyword in lowercase, for formatters configured that way.
    #[must_use]
    pub fn lowercase_keyword(self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Join => "join",
            Self::InnerJoin => "inner join",
            Self::CrossJoin => "cross join",
            Self::NaturalJoin => "natural join",
            Self::NaturalInnerJoin => "natural inner join",
            Self::LeftOuterJoin => "left join",
            Self::RightOuterJoin => "right join",
            Self::FullOuterJoin => "full join",
            Self::StraightJoin => "straight_join",
            Self::OuterApply => "outer apply",
            Self::CrossApply => "cross apply",
        }
    }
}

impl Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_keywords() {
        let expected = [
            ",",
            "JOIN",
            "INNER JOIN",
            "CROSS JOIN",
            "NATURAL JOIN",
            "NATURAL INNER JOIN",
            "LEFT JOIN",
            "RIGHT JOIN",
            "FULL JOIN",
            "STRAIGHT_JOIN",
            "OUTER APPLY",
            "CROSS APPLY",
        ];
        for (join_type, keyword) in JoinType::ALL.iter().zip(expected) {
            assert_eq!(join_type.keyword(), keyword);
            assert_eq!(join_type.to_string(), keyword);
        }
    }

    #[test]
    fn test_lowercase_matches_keyword() {
        for join_type in JoinType::ALL {
            assert_eq!(
                join_type.lowercase_keyword(),
                join_type.keyword().to_lowercase()
            );
        }
    }
}
