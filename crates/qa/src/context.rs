//! Context assembly from retrieved items.

use recall_retrieval::SearchResult;

/// Merge retrieved episodes and facts into a single context string.
///
/// Episodes come first in retrieval order, separated by blank lines. Each
/// fact follows as its own blank-line-separated block carrying its validity
/// timestamp so the model can weigh recency:
///
/// ```text
/// fact: The car is red
/// validAt: 2024-01-01
/// ```
///
/// Pure and deterministic; an empty result yields an empty string.
pub fn assemble(result: &SearchResult) -> String {
    let mut context = result.episodes.join("\n\n");

    for fact in &result.facts {
        if !context.is_empty() {
            context.push_str("\n\n");
        }
        context.push_str("fact: ");
        context.push_str(&fact.fact);
        context.push_str("\nvalidAt: ");
        context.push_str(&fact.valid_at);
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_retrieval::Fact;

    fn fact(text: &str, valid_at: &str) -> Fact {
        Fact {
            fact: text.to_string(),
            valid_at: valid_at.to_string(),
        }
    }

    #[test]
    fn test_empty_result_is_empty_context() {
        assert_eq!(assemble(&SearchResult::default()), "");
    }

    #[test]
    fn test_episodes_joined_by_blank_lines() {
        let result = SearchResult {
            episodes: vec!["first".to_string(), "second".to_string()],
            facts: Vec::new(),
        };

        assert_eq!(assemble(&result), "first\n\nsecond");
    }

    #[test]
    fn test_facts_become_annotated_blocks() {
        let result = SearchResult {
            episodes: Vec::new(),
            facts: vec![fact("The car is red", "2024-01-01")],
        };

        assert_eq!(assemble(&result), "fact: The car is red\nvalidAt: 2024-01-01");
    }

    #[test]
    fn test_mixed_result_keeps_order() {
        let result = SearchResult {
            episodes: vec!["Alice visited Paris".to_string()],
            facts: vec![
                fact("The car is red", "2024-01-01"),
                fact("The car was sold", "2024-03-15"),
            ],
        };

        assert_eq!(
            assemble(&result),
            "Alice visited Paris\n\n\
             fact: The car is red\nvalidAt: 2024-01-01\n\n\
             fact: The car was sold\nvalidAt: 2024-03-15"
        );
    }

    #[test]
    fn test_deterministic() {
        let result = SearchResult {
            episodes: vec!["one".to_string(), "two".to_string()],
            facts: vec![fact("f", "t")],
        };

        assert_eq!(assemble(&result), assemble(&result));
    }
}
