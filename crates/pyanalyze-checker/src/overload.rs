//! Argument matching and overload selection: the call-checking half of the
//! expression evaluator, split out because both plain calls and `@overload`
//! trial-and-error dispatch need the same per-parameter matching loop.

use pyanalyze_common::{Atom, Interner, Span, diagnostics::codes};
use pyanalyze_types::{
    FunctionShape, ParamInfo, ParamKind, TypeArena, TypeId, TypeVarMap, can_assign_with_bindings, specialize,
};
use rustc_hash::FxHashSet;

pub struct ArgError {
    pub span: Span,
    pub code: u32,
    pub message: String,
}

pub struct Argument {
    pub type_id: TypeId,
    pub span: Span,
}

pub struct Keyword {
    pub name: Option<Atom>,
    pub type_id: TypeId,
    pub span: Span,
}

/// Matches a call's positional and keyword arguments against one function
/// signature, inferring type-variable bindings along the way, and returns
/// the specialized return type plus any mismatches found. A bare `*`
/// marker in the source shows up here as a `KeywordOnly`-kind parameter
/// boundary already resolved by the parser; this function only needs to
/// know which params accept positionally vs. by name.
pub fn match_call(
    arena: &mut TypeArena,
    interner: &Interner,
    shape: &FunctionShape,
    args: &[Argument],
    keywords: &[Keyword],
    call_span: Span,
) -> (TypeId, Vec<ArgError>) {
    let mut errors = Vec::new();
    let mut var_map: TypeVarMap = TypeVarMap::default();

    let positional_params: Vec<&ParamInfo> = shape.params.iter().filter(|p| p.kind == ParamKind::Positional).collect();
    let keyword_capable: Vec<&ParamInfo> =
        shape.params.iter().filter(|p| matches!(p.kind, ParamKind::Positional | ParamKind::KeywordOnly)).collect();
    let var_args = shape.params.iter().find(|p| p.kind == ParamKind::VarArgs);
    let var_kwargs = shape.params.iter().find(|p| p.kind == ParamKind::VarKeyword);

    let mut used = vec![false; positional_params.len()];
    for (i, arg) in args.iter().enumerate() {
        if let Some(&p) = positional_params.get(i) {
            used[i] = true;
            check_pair(arena, interner, &mut var_map, arg.type_id, p.type_id, p.name, arg.span, &mut errors);
        } else if let Some(va) = var_args {
            check_pair(arena, interner, &mut var_map, arg.type_id, va.type_id, va.name, arg.span, &mut errors);
        } else {
            errors.push(ArgError {
                span: arg.span,
                code: codes::PARAMETER_COUNT,
                message: format!("Expected {} positional arguments", positional_params.len()),
            });
        }
    }

    let mut seen_kw: FxHashSet<Atom> = FxHashSet::default();
    for kw in keywords {
        let Some(name) = kw.name else {
            // A bare `**expansion` keyword: accepted without a per-pair
            // check since its element type isn't known at this call site.
            continue;
        };
        if !seen_kw.insert(name) {
            errors.push(ArgError {
                span: kw.span,
                code: codes::DUPLICATE_KEYWORD,
                message: format!("Keyword argument \"{}\" already assigned", interner.resolve(name)),
            });
            continue;
        }
        if let Some(&p) = keyword_capable.iter().find(|p| p.name == name) {
            if let Some(idx) = positional_params.iter().position(|pp| pp.name == name) {
                used[idx] = true;
            }
            check_pair(arena, interner, &mut var_map, kw.type_id, p.type_id, name, kw.span, &mut errors);
        } else if let Some(vk) = var_kwargs {
            check_pair(arena, interner, &mut var_map, kw.type_id, vk.type_id, vk.name, kw.span, &mut errors);
        } else {
            errors.push(ArgError {
                span: kw.span,
                code: codes::ARGUMENT_MISMATCH,
                message: format!("No parameter named \"{}\"", interner.resolve(name)),
            });
        }
    }

    for (i, p) in positional_params.iter().enumerate() {
        if used[i] || p.has_default {
            continue;
        }
        if keywords.iter().any(|kw| kw.name == Some(p.name)) {
            continue;
        }
        errors.push(ArgError {
            span: call_span,
            code: codes::PARAMETER_COUNT,
            message: format!("Argument missing for parameter \"{}\"", interner.resolve(p.name)),
        });
    }

    let return_type = specialize(arena, shape.return_type, &var_map);
    (return_type, errors)
}

#[allow(clippy::too_many_arguments)]
fn check_pair(
    arena: &mut TypeArena,
    interner: &Interner,
    var_map: &mut TypeVarMap,
    source: TypeId,
    target: TypeId,
    param_name: Atom,
    span: Span,
    errors: &mut Vec<ArgError>,
) {
    if !can_assign_with_bindings(arena, source, target, Some(var_map)) {
        errors.push(ArgError {
            span,
            code: codes::ARGUMENT_MISMATCH,
            message: format!(
                "Argument cannot be assigned to parameter \"{}\" of type \"{:?}\"",
                interner.resolve(param_name),
                arena.get(target)
            ),
        });
    }
}

/// Tries each overload signature (the `@overload`-decorated stubs, never the
/// implementation body's own signature) in declaration order and commits to
/// the first one every argument matches, silencing the trial's diagnostics;
/// only a final "no overload matched" is reported if every candidate fails.
pub fn select_overload(
    arena: &mut TypeArena,
    interner: &Interner,
    candidates: &[FunctionShape],
    args: &[Argument],
    keywords: &[Keyword],
    call_span: Span,
) -> (TypeId, Vec<ArgError>) {
    for shape in candidates {
        let (ty, errors) = match_call(arena, interner, shape, args, keywords, call_span);
        if errors.is_empty() {
            return (ty, errors);
        }
    }
    (
        TypeId::UNKNOWN,
        vec![ArgError { span: call_span, code: codes::OVERLOAD_NO_MATCH, message: "No overload matches this call".to_string() }],
    )
}

#[cfg(test)]
#[path = "tests/overload.rs"]
mod tests;
