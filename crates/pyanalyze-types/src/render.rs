//! Diagnostic rendering: turns a `TypeId` into the string a diagnostic
//! message or a hover response shows a user, e.g. `int | None`,
//! `(x: int) -> str`, `list[str]`. Recursion through a cyclic type graph
//! (a class whose own method refers back to the class) is guarded by a
//! `seen` set so a self-referential signature renders as `...` instead of
//! looping forever.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::ids::{ClassId, TypeId};
use crate::types::{LiteralValue, Type};
use crate::TypeArena;
use pyanalyze_common::Interner;

/// Renders `id` as the short type-expression string a user would write in
/// an annotation. `interner` supplies class/function/module names.
#[must_use]
pub fn as_string(arena: &TypeArena, interner: &Interner, id: TypeId) -> String {
    let mut seen = FxHashSet::default();
    render(arena, interner, id, &mut seen)
}

fn render(arena: &TypeArena, interner: &Interner, id: TypeId, seen: &mut FxHashSet<TypeId>) -> String {
    if !seen.insert(id) {
        return "...".to_string();
    }
    let rendered = match arena.get(id) {
        Type::Unknown => "Unknown".to_string(),
        Type::Any => "Any".to_string(),
        Type::Never => "Never".to_string(),
        Type::None => "None".to_string(),
        Type::Module(name) => format!("module \"{}\"", interner.resolve(*name)),
        Type::Bool => "bool".to_string(),
        Type::Int => "int".to_string(),
        Type::Float => "float".to_string(),
        Type::Str => "str".to_string(),
        Type::Bytes => "bytes".to_string(),
        Type::Object => "object".to_string(),
        Type::Class(class_id) => format!("type[{}]", class_name(arena, interner, *class_id)),
        Type::Instance(class_id, args) => render_instance(arena, interner, *class_id, args, seen),
        Type::Union(members) => render_union(arena, interner, members, seen),
        Type::Tuple(shape_id) => render_tuple(arena, interner, *shape_id, seen),
        Type::Callable(shape_id) => render_callable(arena, interner, *shape_id, seen),
        Type::TypeVarRef(var_id) => interner.resolve(arena.type_var(*var_id).name).to_string(),
        Type::Literal(value) => render_literal(value),
        Type::Unresolved(name) => format!("Unknown[\"{}\"]", interner.resolve(*name)),
    };
    seen.remove(&id);
    rendered
}

fn class_name<'a>(arena: &TypeArena, interner: &'a Interner, class_id: ClassId) -> &'a str {
    interner.resolve(arena.class(class_id).name)
}

fn render_instance(
    arena: &TypeArena,
    interner: &Interner,
    class_id: ClassId,
    args: &SmallVec<[TypeId; 2]>,
    seen: &mut FxHashSet<TypeId>,
) -> String {
    let name = class_name(arena, interner, class_id);
    if args.is_empty() {
        return name.to_string();
    }
    let rendered_args: Vec<String> = args.iter().map(|&arg| render(arena, interner, arg, seen)).collect();
    format!("{name}[{}]", rendered_args.join(", "))
}

fn render_union(arena: &TypeArena, interner: &Interner, members: &SmallVec<[TypeId; 4]>, seen: &mut FxHashSet<TypeId>) -> String {
    members.iter().map(|&member| render(arena, interner, member, seen)).collect::<Vec<_>>().join(" | ")
}

fn render_tuple(arena: &TypeArena, interner: &Interner, shape_id: crate::ids::TupleShapeId, seen: &mut FxHashSet<TypeId>) -> String {
    let shape = arena.tuple_shape(shape_id);
    let mut parts: Vec<String> = shape.elements.iter().map(|&element| render(arena, interner, element, seen)).collect();
    if shape.open {
        parts.push("...".to_string());
    }
    format!("tuple[{}]", parts.join(", "))
}

fn render_callable(
    arena: &TypeArena,
    interner: &Interner,
    shape_id: crate::ids::FunctionShapeId,
    seen: &mut FxHashSet<TypeId>,
) -> String {
    let shape = arena.function_shape(shape_id);
    let params: Vec<String> = shape
        .params
        .iter()
        .map(|param| format!("{}: {}", interner.resolve(param.name), render(arena, interner, param.type_id, seen)))
        .collect();
    let ret = render(arena, interner, shape.return_type, seen);
    format!("({}) -> {ret}", params.join(", "))
}

fn render_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Int(n) => format!("Literal[{n}]"),
        LiteralValue::Bool(b) => format!("Literal[{b}]"),
        LiteralValue::Str(s) => format!("Literal[{s:?}]"),
        LiteralValue::Bytes(b) => format!("Literal[b{:?}]", String::from_utf8_lossy(b)),
    }
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
