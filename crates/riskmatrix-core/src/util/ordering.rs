//! Deterministic ordering helpers.
//!
//! Reports list risks in a stable order so identical registers always
//! produce identical output, whatever order the records arrived in.

use std::cmp::Reverse;

use crate::report::model::ClassifiedRisk;

/// Sort by score (highest first), then by id. Records without an id sort
/// after those with one at the same score.
pub fn sort_classified_risks(risks: &mut [ClassifiedRisk]) {
    risks.sort_by(|a, b| {
        (
            Reverse(a.classification.score),
            a.id.is_none(),
            a.id.as_deref(),
        )
            .cmp(&(
                Reverse(b.classification.score),
                b.id.is_none(),
                b.id.as_deref(),
            ))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::matrix::{MatrixConfig, MatrixDimension};

    fn risk(id: Option<&str>, p: i32, i: i32) -> ClassifiedRisk {
        let config = MatrixConfig::builtin(MatrixDimension::Five);
        ClassifiedRisk {
            id: id.map(str::to_string),
            classification: classify(p, i, &config),
        }
    }

    fn ids(risks: &[ClassifiedRisk]) -> Vec<Option<&str>> {
        risks.iter().map(|r| r.id.as_deref()).collect()
    }

    #[test]
    fn orders_by_score_descending_then_id() {
        let mut risks = vec![
            risk(Some("b"), 2, 2),
            risk(Some("c"), 5, 5),
            risk(Some("a"), 4, 1),
            risk(None, 2, 2),
        ];

        sort_classified_risks(&mut risks);

        assert_eq!(ids(&risks), vec![Some("c"), Some("a"), Some("b"), None]);
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let make = || {
            vec![
                risk(Some("r-2"), 3, 3),
                risk(Some("r-1"), 3, 3),
                risk(Some("r-3"), 1, 5),
            ]
        };

        let mut first = make();
        let mut second = make();
        second.reverse();

        sort_classified_risks(&mut first);
        sort_classified_risks(&mut second);

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec![Some("r-1"), Some("r-2"), Some("r-3")]);
    }
}
