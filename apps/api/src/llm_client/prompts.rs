// Cross-cutting prompt fragments. Each pipeline keeps its own prompts.rs and
// pulls shared wording from here.

/// Prepended to every structured-extraction prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Appended to every resume prompt.
pub const FACTUALITY_INSTRUCTION: &str = "Maintain factual accuracy: never invent roles, \
    employers, dates, degrees or metrics that the original resume does not support.";

/// Substitutes `{key}` slots in a single pass, so slot-like text inside a
/// substituted value is never expanded.
pub fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let slot = slots
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match slot {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
