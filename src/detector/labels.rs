use regex::Regex;

/// Parse class names out of the ONNX `names` metadata value.
///
/// String format: `{0: 'person', 1: 'bicycle', 2: 'sports ball', ...}`
pub(crate) fn parse_metadata_names(names: &str) -> Vec<String> {
    let re = Regex::new(r#"(['"])([-()\w '"]+)(['"])"#).expect("class name pattern");
    let mut parsed = vec![];
    for (_, [_, name, _]) in re.captures_iter(names).map(|x| x.extract()) {
        parsed.push(name.to_string());
    }
    parsed
}

/// Placeholder class table for models that ship neither metadata nor a
/// labels file.
pub(crate) fn placeholder_names(n: usize) -> Vec<String> {
    (0..n).map(|x| format!("class_{x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ultralytics_metadata_format() {
        let names = parse_metadata_names("{0: 'person', 1: 'bicycle', 2: 'sports ball'}");
        assert_eq!(names, vec!["person", "bicycle", "sports ball"]);
    }

    #[test]
    fn empty_metadata_yields_no_names() {
        assert!(parse_metadata_names("{}").is_empty());
    }

    #[test]
    fn placeholders_are_indexed() {
        assert_eq!(placeholder_names(2), vec!["class_0", "class_1"]);
    }
}
