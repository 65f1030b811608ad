use crate::util::eq_ignore_case;

/// Class tokens left over after removing the selector's class.
///
/// `class_attr` is split on spaces and each token trimmed; tokens equal
/// (case-insensitively) to `target_selector` without its leading `.` are
/// dropped. Repeated or trailing spaces leave empty tokens in the result,
/// which makes the class list ambiguous for [`semantic_class`].
pub fn leftover_classes(class_attr: &str, target_selector: &str) -> Vec<String> {
    let target = target_selector.trim().trim_start_matches('.');
    class_attr
        .split(' ')
        .map(str::trim)
        .filter(|token| !eq_ignore_case(token, target))
        .map(str::to_string)
        .collect()
}

/// The single semantic class on an element, or `None` when there are zero or
/// several leftover classes.
pub fn semantic_class(class_attr: &str, target_selector: &str) -> Option<String> {
    let mut leftovers = leftover_classes(class_attr, target_selector);
    if leftovers.len() == 1 {
        leftovers.pop()
    } else {
        None
    }
}
