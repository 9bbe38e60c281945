//! Built-in templates
//!
//! One ready-to-use template per category (except `custom`), loaded by
//! [`TemplateRegistry::with_defaults`](crate::TemplateRegistry::with_defaults).

use crate::parameter::{ParameterType, Params};
use crate::{Category, Template, TemplateBuilder};
use serde_json::json;

/// Build every built-in template
///
/// # Panics
///
/// Panics if a built-in definition is invalid, which the tests rule out.
#[allow(clippy::expect_used)]
pub fn builtin_templates() -> Vec<Template> {
    [
        general_assistant(),
        creative_writer(),
        code_reviewer(),
        tutor(),
        data_analyst(),
        conversation_partner(),
    ]
    .into_iter()
    .map(|builder| builder.build().expect("built-in templates must build"))
    .collect()
}

#[allow(clippy::panic)]
fn example(value: serde_json::Value) -> Params {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("built-in example must be a JSON object, got {other}"),
    }
}

fn general_assistant() -> TemplateBuilder {
    Template::builder("general_assistant")
        .category(Category::Assistant)
        .description("General-purpose helpful assistant")
        .system(
            "You are a helpful, accurate and concise assistant. \
             Answer in a {tone} tone.",
        )
        .user("{question}")
        .parameter("tone", ParameterType::String)
        .parameter("question", ParameterType::String)
        .example(example(json!({
            "tone": "friendly",
            "question": "How do I boil an egg?"
        })))
        .tags(["general", "qa"])
}

fn creative_writer() -> TemplateBuilder {
    Template::builder("creative_writer")
        .category(Category::Creative)
        .description("Short fiction and poetry in a chosen style")
        .system(
            "You are a creative writer with a vivid imagination. \
             Write in the style of {style}.",
        )
        .user("Write a {form} about {topic}.")
        .parameter("style", ParameterType::String)
        .parameter("form", ParameterType::String)
        .parameter("topic", ParameterType::String)
        .example(example(json!({
            "style": "a fairy tale",
            "form": "short story",
            "topic": "a lighthouse keeper"
        })))
        .tags(["creative", "writing", "story"])
}

fn code_reviewer() -> TemplateBuilder {
    Template::builder("code_reviewer")
        .category(Category::Technical)
        .description("Reviews code for bugs, style and performance")
        .system(
            "You are an experienced {language} engineer. Review code for \
             correctness, readability and performance, and suggest concrete fixes.",
        )
        .user("Review the following {language} code:\n\n{code}")
        .parameter("language", ParameterType::String)
        .parameter("code", ParameterType::String)
        .example(example(json!({
            "language": "Rust",
            "code": "fn add(a: i32, b: i32) -> i32 { a + b }"
        })))
        .tags(["code", "review", "programming"])
}

fn tutor() -> TemplateBuilder {
    Template::builder("tutor")
        .category(Category::Educational)
        .description("Explains a subject at a given level")
        .system(
            "You are a patient tutor. Explain {subject} to a student at the \
             {level} level, using examples and checking for understanding.",
        )
        .user("Explain: {concept}")
        .parameter("subject", ParameterType::String)
        .parameter("level", ParameterType::String)
        .parameter("concept", ParameterType::String)
        .example(example(json!({
            "subject": "physics",
            "level": "high school",
            "concept": "Newton's second law"
        })))
        .tags(["teaching", "explanation"])
}

fn data_analyst() -> TemplateBuilder {
    Template::builder("data_analyst")
        .category(Category::Analysis)
        .description("Summarises data and highlights key findings")
        .system(
            "You are a careful data analyst. Identify trends, outliers and \
             limitations, and report at most {max_points} key findings.",
        )
        .user("Analyze this data:\n\n{data}")
        .parameter("max_points", ParameterType::Integer)
        .parameter("data", ParameterType::String)
        .example(example(json!({
            "max_points": 3,
            "data": "month,sales\nJan,100\nFeb,140\nMar,90"
        })))
        .tags(["data", "analysis", "summary"])
}

fn conversation_partner() -> TemplateBuilder {
    Template::builder("conversation_partner")
        .category(Category::Conversation)
        .description("Casual conversation practice")
        .system(
            "You are {persona}, a friendly conversation partner. Keep replies \
             short and ask follow-up questions.",
        )
        .user("{message}")
        .parameter("persona", ParameterType::String)
        .parameter("message", ParameterType::String)
        .example(example(json!({
            "persona": "Sam",
            "message": "I just got back from a trip to Lisbon."
        })))
        .tags(["chat", "practice"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_build() {
        assert_eq!(builtin_templates().len(), 6);
    }

    #[test]
    fn test_one_per_category() {
        let templates = builtin_templates();
        for category in Category::ALL {
            let count = templates.iter().filter(|t| t.category() == category).count();
            let expected = usize::from(category != Category::Custom);
            assert_eq!(count, expected, "category {category}");
        }
    }

    #[test]
    fn test_examples_satisfy_contract() {
        for template in builtin_templates() {
            assert!(
                template.validate_examples().is_empty(),
                "template {} has invalid examples",
                template.name()
            );
            for example in template.example_inputs() {
                assert!(template.render(example).is_ok());
            }
        }
    }

    #[test]
    fn test_every_builtin_has_nonempty_examples() {
        for template in builtin_templates() {
            assert!(!template.example_inputs().is_empty(), "{}", template.name());
            for example in template.example_inputs() {
                assert!(!example.is_empty(), "{}", template.name());
            }
        }
    }

    #[test]
    #[should_panic(expected = "must be a JSON object")]
    fn test_non_object_example_panics() {
        let _ = example(json!(["tone", "question"]));
    }

    #[test]
    fn test_declared_parameters_are_required() {
        for template in builtin_templates() {
            let required = template.required_parameters();
            for name in template.declared_parameters().keys() {
                assert!(required.contains(name), "{}: {name}", template.name());
            }
        }
    }
}
