use super::*;
use pyanalyze_common::Span;
use pyanalyze_types::{FunctionShape, ParamInfo, ParamKind};
use smallvec::smallvec;

fn shape(interner: &mut Interner, param_name: &str, param_type: TypeId, return_type: TypeId) -> FunctionShape {
    FunctionShape {
        name: interner.intern("f"),
        type_params: smallvec![],
        params: vec![ParamInfo { name: interner.intern(param_name), type_id: param_type, kind: ParamKind::Positional, has_default: false }],
        return_type,
        is_bound: false,
        overloads: Vec::new(),
    }
}

#[test]
fn matching_argument_types_produces_no_errors() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let shape = shape(&mut interner, "x", TypeId::INT, TypeId::INT);
    let args = [Argument { type_id: TypeId::INT, span: Span::new(0, 1) }];
    let (ty, errors) = match_call(&mut arena, &interner, &shape, &args, &[], Span::new(0, 1));
    assert!(errors.is_empty());
    assert_eq!(ty, TypeId::INT);
}

#[test]
fn mismatched_argument_type_is_reported() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let shape = shape(&mut interner, "x", TypeId::INT, TypeId::INT);
    let args = [Argument { type_id: TypeId::STR, span: Span::new(0, 1) }];
    let (_ty, errors) = match_call(&mut arena, &interner, &shape, &args, &[], Span::new(0, 1));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, pyanalyze_common::diagnostics::codes::ARGUMENT_MISMATCH);
}

#[test]
fn missing_required_argument_is_a_parameter_count_error() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let shape = shape(&mut interner, "x", TypeId::INT, TypeId::INT);
    let (_ty, errors) = match_call(&mut arena, &interner, &shape, &[], &[], Span::new(0, 1));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, pyanalyze_common::diagnostics::codes::PARAMETER_COUNT);
}

#[test]
fn overload_selection_picks_the_first_matching_candidate() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let int_overload = shape(&mut interner, "x", TypeId::INT, TypeId::INT);
    let str_overload = shape(&mut interner, "x", TypeId::STR, TypeId::STR);
    let args = [Argument { type_id: TypeId::STR, span: Span::new(0, 1) }];
    let (ty, errors) =
        select_overload(&mut arena, &interner, &[int_overload, str_overload], &args, &[], Span::new(0, 1));
    assert!(errors.is_empty());
    assert_eq!(ty, TypeId::STR);
}

#[test]
fn overload_selection_reports_no_match_when_every_candidate_fails() {
    let mut arena = TypeArena::new();
    let mut interner = Interner::new();
    let int_overload = shape(&mut interner, "x", TypeId::INT, TypeId::INT);
    let args = [Argument { type_id: TypeId::FLOAT, span: Span::new(0, 1) }];
    let (_ty, errors) = select_overload(&mut arena, &interner, &[int_overload], &args, &[], Span::new(0, 1));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, pyanalyze_common::diagnostics::codes::OVERLOAD_NO_MATCH);
}
