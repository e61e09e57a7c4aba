use exploration_core::{
    expression::{interpolated_expressions, params_referenced_in, parse_expression, Expr},
    type_checker::{infer_type, ParamType, TypeCheckError, TypeEnvironment, TypeEnvironments},
};
use proptest::prelude::*;

fn envs() -> TypeEnvironments {
    TypeEnvironments::new(vec![
        TypeEnvironment::new().with("attempts", ParamType::Real),
        TypeEnvironment::new()
            .with("attempts", ParamType::UnicodeString)
            .with("learner", ParamType::UnicodeString),
    ])
    .with_system()
}

#[test]
fn test_types_of_content_expressions() {
    let envs = envs();
    let html = "<p>Hi {{learner}}, you used {{ attempts + 1 }} tries.</p>{{ attempts >= 3 }}";
    let types: Vec<ParamType> = interpolated_expressions(html)
        .into_iter()
        .map(|source| infer_type(source, &envs).unwrap())
        .collect();
    assert_eq!(
        types,
        vec![ParamType::UnicodeString, ParamType::Real, ParamType::Boolean]
    );
}

#[test]
fn test_first_environment_shadows_later_ones() {
    let envs = envs();
    assert_eq!(infer_type("attempts", &envs).unwrap(), ParamType::Real);
    let shadowed = TypeEnvironments::new(vec![
        TypeEnvironment::new().with("floor", ParamType::UnicodeString),
    ])
    .with_system();
    assert_eq!(infer_type("floor", &shadowed).unwrap(), ParamType::UnicodeString);
}

#[test]
fn test_fatal_expression_errors() {
    let envs = envs();
    assert_eq!(
        infer_type("score * 2", &envs),
        Err(TypeCheckError::UndefinedVariable("score".to_string()))
    );
    assert!(matches!(
        infer_type("attempts *", &envs),
        Err(TypeCheckError::MalformedExpression { .. })
    ));
    // Without the system layer operators are unknown names too.
    let bare = TypeEnvironments::new(vec![TypeEnvironment::new().with("a", ParamType::Real)]);
    assert_eq!(
        infer_type("a + a", &bare),
        Err(TypeCheckError::UndefinedVariable("+".to_string()))
    );
}

#[test]
fn test_params_referenced_in_html() {
    let params = params_referenced_in("{{a}} {{ floor(b / 2) }} {{ 'text' }} {{ broken + }}");
    let params: Vec<&str> = params.iter().map(String::as_str).collect();
    assert_eq!(params, vec!["a", "b"]);
}

#[test]
fn test_deep_nesting_is_malformed() {
    let envs = envs();
    let shallow = format!("{}attempts{}", "(".repeat(20), ")".repeat(20));
    assert_eq!(infer_type(&shallow, &envs).unwrap(), ParamType::Real);

    let deep = format!("{}attempts{}", "(".repeat(5000), ")".repeat(5000));
    assert!(matches!(
        infer_type(&deep, &envs),
        Err(TypeCheckError::MalformedExpression { .. })
    ));
    assert!(matches!(
        infer_type(&format!("{}attempts", "!".repeat(5000)), &envs),
        Err(TypeCheckError::MalformedExpression { .. })
    ));

    let html = format!("{{{{ {} }}}} {{{{ learner }}}}", deep);
    let params = params_referenced_in(&html);
    let params: Vec<&str> = params.iter().map(String::as_str).collect();
    assert_eq!(params, vec!["learner"]);
}

proptest! {
    #[test]
    fn test_identifiers_parse_as_variables(name in "[a-zA-Z][a-zA-Z0-9_]{0,12}") {
        prop_assert_eq!(parse_expression(&name).unwrap(), Expr::variable(name.clone()));
    }

    #[test]
    fn test_numbers_are_real(n in 0u32..100000, frac in 0u32..1000) {
        let source = format!("{}.{}", n, frac);
        prop_assert_eq!(infer_type(&source, &envs()).unwrap(), ParamType::Real);
    }
}
