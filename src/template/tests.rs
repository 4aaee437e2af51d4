//! Tests for template parsing and rendering.

use super::*;
use std::collections::HashMap;

fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn text(name: &str, default: &str) -> ParamDescriptor {
    ParamDescriptor {
        name: name.to_string(),
        default: default.to_string(),
        ..Default::default()
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_basic_params() {
    let params = parse("ssh {{host}} -p {{port}}");
    assert_eq!(params, vec![text("host", ""), text("port", "")]);
}

#[test]
fn test_parse_with_defaults() {
    let params = parse("ssh {{host:localhost}} -p {{port:22}}");
    assert_eq!(params, vec![text("host", "localhost"), text("port", "22")]);
}

#[test]
fn test_parse_no_params() {
    assert!(parse("echo hello").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn test_parse_deduplicates_in_first_appearance_order() {
    let params = parse("curl -H 'Auth: {{token}}' {{url}}/api/{{version}}/{{url}}");
    let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["token", "url", "version"]);
}

#[test]
fn test_parse_duplicate_last_default_wins() {
    let params = parse("{{a}} {{b:x}} {{a:y}}");
    assert_eq!(params, vec![text("a", "y"), text("b", "x")]);
}

#[test]
fn test_parse_duplicate_without_default_keeps_earlier_default() {
    let params = parse("{{a:first}} {{a}}");
    assert_eq!(params, vec![text("a", "first")]);
}

#[test]
fn test_parse_default_with_colons() {
    let params = parse("{{url:http://localhost:8080}}");
    assert_eq!(params, vec![text("url", "http://localhost:8080")]);
}

#[test]
fn test_parse_default_with_spaces() {
    let params = parse("{{name:default with spaces}}");
    assert_eq!(params, vec![text("name", "default with spaces")]);
}

#[test]
fn test_parse_dynamic_takes_priority_over_pipe() {
    let params = parse("{{branch!git branch | grep feature}}");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "branch");
    assert_eq!(params[0].kind, ParamKind::Dynamic);
    assert_eq!(params[0].dynamic_cmd, "git branch | grep feature");
    assert!(params[0].options.is_empty());
    assert!(params[0].default.is_empty());
}

#[test]
fn test_parse_dynamic_keeps_colons_verbatim() {
    let params = parse("{{pod!kubectl get pods -o name | cut -d: -f2}}");
    assert_eq!(params[0].kind, ParamKind::Dynamic);
    assert_eq!(params[0].dynamic_cmd, "kubectl get pods -o name | cut -d: -f2");
}

#[test]
fn test_parse_dynamic_splits_on_first_bang() {
    let params = parse("{{x!echo hi!}}");
    assert_eq!(params[0].name, "x");
    assert_eq!(params[0].dynamic_cmd, "echo hi!");
}

#[test]
fn test_parse_enum_with_starred_default() {
    let params = parse("{{env|dev|staging|*prod}}");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].kind, ParamKind::Enum);
    assert_eq!(params[0].options, vec!["dev", "staging", "prod"]);
    assert_eq!(params[0].default, "prod");
}

#[test]
fn test_parse_enum_without_default() {
    let params = parse("{{level|low|high}}");
    assert_eq!(params[0].options, vec!["low", "high"]);
    assert!(params[0].default.is_empty());
}

#[test]
fn test_parse_enum_pipe_beats_colon() {
    let params = parse("{{proto|http:80|https:443}}");
    assert_eq!(params[0].kind, ParamKind::Enum);
    assert_eq!(params[0].name, "proto");
    assert_eq!(params[0].options, vec!["http:80", "https:443"]);
}

#[test]
fn test_parse_enum_first_star_is_default() {
    let params = parse("{{x|*a|*b}}");
    assert_eq!(params[0].options, vec!["a", "b"]);
    assert_eq!(params[0].default, "a");
}

#[test]
fn test_parse_enum_skips_empty_segments() {
    let params = parse("{{x|a||*|b}}");
    assert_eq!(params[0].options, vec!["a", "b"]);
    assert!(params[0].default.is_empty());
}

#[test]
fn test_parse_skips_empty_names() {
    assert!(parse("{{!ls}} {{:x}} {{|a|b}}").is_empty());
}

#[test]
fn test_parse_name_is_not_trimmed() {
    let params = parse("{{ host }}");
    assert_eq!(params[0].name, " host ");
}

#[test]
fn test_parse_unterminated_placeholder_is_ignored() {
    assert!(parse("echo {{host").is_empty());
    assert!(parse("echo {{}}").is_empty());
}

#[test]
fn test_parse_repeat_default_updates_enum_but_keeps_options() {
    let parsed = ParsedTemplate::parse("{{env|dev|prod}} {{env:prod}}");
    assert!(parsed.redeclarations().is_empty());
    let params = parsed.params();
    assert_eq!(params[0].kind, ParamKind::Enum);
    assert_eq!(params[0].options, vec!["dev", "prod"]);
    assert_eq!(params[0].default, "prod");
}

#[test]
fn test_parse_redeclaration_keeps_first_kind() {
    let parsed = ParsedTemplate::parse("{{x}} {{x|a|b}}");
    assert_eq!(parsed.params().len(), 1);
    assert_eq!(parsed.params()[0].kind, ParamKind::Text);
    assert!(parsed.params()[0].options.is_empty());
    assert_eq!(
        parsed.redeclarations(),
        &[Redeclaration {
            name: "x".to_string(),
            first: ParamKind::Text,
            later: ParamKind::Enum,
        }]
    );
}

#[test]
fn test_parse_redeclaration_of_dynamic_command() {
    let parsed = ParsedTemplate::parse("{{b!git branch}} {{b!git tag}} {{b!git branch}}");
    assert_eq!(parsed.params()[0].dynamic_cmd, "git branch");
    assert_eq!(parsed.redeclarations().len(), 1);
    assert_eq!(
        parsed.redeclarations()[0].to_string(),
        "parameter 'b' redeclared with a different dynamic definition; keeping the first"
    );
}

#[test]
fn test_parse_starred_repeat_updates_default() {
    let params = parse("{{env|dev|*prod}} {{env|dev|*prod}} {{env:dev}}");
    assert_eq!(params[0].default, "dev");
}

#[test]
fn test_descriptor_serializes_as_args_entry() {
    let params = parse("{{env|dev|*prod}} {{host}}");
    let yaml = serde_yaml::to_string(&params).unwrap();
    assert!(yaml.contains("type: enum"));
    assert!(yaml.contains("default: prod"));
    assert!(yaml.contains("type: text"));
    assert!(!yaml.contains("dynamic_cmd"));

    let back: Vec<ParamDescriptor> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, params);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_basic_substitution() {
    assert_eq!(render("ssh {{host}}", &vars([("host", "prod")])), "ssh prod");
}

#[test]
fn test_render_value_overrides_default() {
    assert_eq!(
        render("ssh {{host:localhost}}", &vars([("host", "prod")])),
        "ssh prod"
    );
}

#[test]
fn test_render_default_used_when_no_value() {
    assert_eq!(render_defaults("ssh {{host:localhost}}"), "ssh localhost");
}

#[test]
fn test_render_empty_value_falls_back_to_default() {
    assert_eq!(
        render("ssh {{host:localhost}}", &vars([("host", "")])),
        "ssh localhost"
    );
}

#[test]
fn test_render_empty_value_without_default_leaves_placeholder() {
    assert_eq!(render("ssh {{host}}", &vars([("host", "")])), "ssh {{host}}");
}

#[test]
fn test_render_all_occurrences_substituted() {
    assert_eq!(
        render("echo {{msg}} && echo {{msg}}", &vars([("msg", "hi")])),
        "echo hi && echo hi"
    );
}

#[test]
fn test_render_missing_param_placeholder_stays() {
    assert_eq!(render_defaults("ssh {{host}}"), "ssh {{host}}");
}

#[test]
fn test_render_no_params_passthrough() {
    for input in ["echo hello", "", "a } b { c", "echo {{", "{{}}"] {
        assert_eq!(render_defaults(input), input);
        assert!(parse(input).is_empty());
    }
}

#[test]
fn test_render_mixed_provided_and_default() {
    assert_eq!(
        render("ssh {{host}} -p {{port:22}}", &vars([("host", "prod")])),
        "ssh prod -p 22"
    );
}

#[test]
fn test_render_colon_in_default() {
    assert_eq!(
        render_defaults("{{url:http://localhost:8080}}"),
        "http://localhost:8080"
    );
}

#[test]
fn test_render_enum_default_and_value() {
    let template = "deploy --env {{env|dev|staging|*prod}}";
    assert_eq!(render_defaults(template), "deploy --env prod");
    assert_eq!(
        render(template, &vars([("env", "dev")])),
        "deploy --env dev"
    );
}

#[test]
fn test_render_enum_without_default_stays() {
    assert_eq!(render_defaults("{{x|a|b}}"), "{{x|a|b}}");
}

#[test]
fn test_render_dynamic() {
    let template = "git checkout {{branch!git branch | grep feature}}";
    assert_eq!(render_defaults(template), template);
    assert_eq!(
        render(template, &vars([("branch", "feature/x")])),
        "git checkout feature/x"
    );
}

#[test]
fn test_render_uses_each_placeholders_own_default() {
    // Rendering is placeholder-driven, not descriptor-driven.
    assert_eq!(render_defaults("{{a:one}} {{a:two}} {{a}}"), "one two {{a}}");
}

#[test]
fn test_render_empty_name_left_verbatim() {
    assert_eq!(
        render("{{!ls}} {{:x}}", &vars([("", "boom")])),
        "{{!ls}} {{:x}}"
    );
}

#[test]
fn test_render_values_are_not_rescanned() {
    let out = render("echo {{a}}", &vars([("a", "{{b}}"), ("b", "nope")]));
    assert_eq!(out, "echo {{b}}");
}

#[test]
fn test_render_values_with_dollar_signs_are_literal() {
    assert_eq!(
        render("echo {{v}}", &vars([("v", "$HOME ${1}")])),
        "echo $HOME ${1}"
    );
}

#[test]
fn test_render_empty_map_equals_defaults_only() {
    let templates = [
        "ssh {{user:root}}@{{host}} -p {{port:22}}",
        "{{env|a|*b}} {{d!ls}} {{plain}}",
        "kubectl {{ns:default}} {{ns}}",
    ];
    for template in templates {
        let defaults: HashMap<String, String> = parse(template)
            .into_iter()
            .filter(|p| p.has_default())
            .map(|p| (p.name, p.default))
            .collect();
        let by_defaults = render(template, &defaults);
        let by_empty = render_defaults(template);
        // Placeholders without a default of their own remain verbatim only
        // when no other occurrence supplied one.
        if template.contains("{{ns}}") {
            assert_eq!(by_empty, "kubectl default {{ns}}");
            assert_eq!(by_defaults, "kubectl default default");
        } else {
            assert_eq!(by_defaults, by_empty);
        }
    }
}

#[test]
fn test_render_is_deterministic() {
    let template = "{{a}} {{b:x}} {{c|1|*2}}";
    let values = vars([("a", "A")]);
    assert_eq!(render(template, &values), render(template, &values));
    assert_eq!(render(template, &values), "A x 2");
}

#[test]
fn test_render_unicode() {
    assert_eq!(
        render("echo {{msg:日本語}} {{e}}", &vars([("e", "🎉")])),
        "echo 日本語 🎉"
    );
}
