//! Greeting templates and reply personalization.

use regex::Regex;

/// Opening line when the user's name is known.
pub fn greeting_for(name: Option<&str>) -> String {
    match name {
        Some(name) => format!(
            "Hi {name}, I'm really glad you're here. This is a safe space to share \
             whatever is on your mind. How are you feeling today?"
        ),
        None => "Hi there, I'm really glad you're here. This is a safe space to share \
                 whatever is on your mind. How are you feeling today?"
            .to_string(),
    }
}

/// Whether `text` already opens by greeting `name` ("hey, Sam", "Hi Sam",
/// "hello, sam" ...).
pub fn opens_with_greeting(text: &str, name: &str) -> bool {
    let pattern = format!(
        r"(?i)^\s*(?:hey|hi|hello),?\s+{}(?:$|[^\p{{L}}\p{{N}}_])",
        regex::escape(name)
    );
    Regex::new(&pattern).is_ok_and(|re| re.is_match(text))
}

/// Prefix the reply with `"Hey, {name}. "` unless it already greets the user.
pub fn personalize_reply(raw: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !opens_with_greeting(raw, name) => format!("Hey, {name}. {raw}"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_greeting_is_not_doubled() {
        let raw = "Hey, Sam, that sounds hard.";
        assert_eq!(personalize_reply(raw, Some("Sam")), raw);
    }

    #[test]
    fn missing_greeting_is_prefixed() {
        assert_eq!(
            personalize_reply("That sounds hard.", Some("Sam")),
            "Hey, Sam. That sounds hard."
        );
    }

    #[test]
    fn no_name_means_verbatim() {
        assert_eq!(personalize_reply("That sounds hard.", None), "That sounds hard.");
    }

    #[test]
    fn greeting_match_is_case_insensitive() {
        assert!(opens_with_greeting("HELLO, sam! good to see you", "Sam"));
        assert!(opens_with_greeting("hi, Sam", "Sam"));
        assert!(opens_with_greeting("Hi Sam.", "Sam"));
    }

    #[test]
    fn name_must_match_whole_word() {
        assert!(!opens_with_greeting("Hey, Samantha, welcome back", "Sam"));
        assert!(!opens_with_greeting("Well hey, Sam", "Sam"));
    }

    #[test]
    fn names_with_regex_metacharacters_are_escaped() {
        assert!(opens_with_greeting("Hi, J.D. good morning", "J.D."));
        assert_eq!(
            personalize_reply("Okay.", Some("a+b")),
            "Hey, a+b. Okay."
        );
    }

    #[test]
    fn greeting_templates_differ_by_name() {
        assert!(greeting_for(Some("Sam")).starts_with("Hi Sam,"));
        assert!(greeting_for(None).starts_with("Hi there,"));
    }
}
