use super::*;
use crate::types::TypeArena;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct SymbolKey(u32);

#[test]
fn single_contribution_is_returned_as_is() {
    let mut arena = TypeArena::new();
    let mut agg: InferredTypeAggregator<SymbolKey> = InferredTypeAggregator::new();
    agg.record(&mut arena, SymbolKey(1), SourceId(0), TypeId::INT);
    assert_eq!(agg.combined_type(SymbolKey(1)), Some(TypeId::INT));
}

#[test]
fn multiple_sources_combine_into_a_union() {
    let mut arena = TypeArena::new();
    let mut agg: InferredTypeAggregator<SymbolKey> = InferredTypeAggregator::new();
    agg.record(&mut arena, SymbolKey(1), SourceId(0), TypeId::INT);
    agg.record(&mut arena, SymbolKey(1), SourceId(1), TypeId::STR);
    let combined = agg.combined_type(SymbolKey(1)).unwrap();
    assert!(crate::assign::can_assign(&arena, TypeId::INT, combined));
    assert!(crate::assign::can_assign(&arena, TypeId::STR, combined));
}

#[test]
fn recombination_is_independent_of_visit_order() {
    let mut arena_a = TypeArena::new();
    let mut agg_a: InferredTypeAggregator<SymbolKey> = InferredTypeAggregator::new();
    agg_a.record(&mut arena_a, SymbolKey(1), SourceId(0), TypeId::INT);
    agg_a.record(&mut arena_a, SymbolKey(1), SourceId(1), TypeId::STR);
    agg_a.record(&mut arena_a, SymbolKey(1), SourceId(2), TypeId::NONE);

    let mut arena_b = TypeArena::new();
    let mut agg_b: InferredTypeAggregator<SymbolKey> = InferredTypeAggregator::new();
    agg_b.record(&mut arena_b, SymbolKey(1), SourceId(2), TypeId::NONE);
    agg_b.record(&mut arena_b, SymbolKey(1), SourceId(0), TypeId::INT);
    agg_b.record(&mut arena_b, SymbolKey(1), SourceId(1), TypeId::STR);

    assert_eq!(agg_a.combined_type(SymbolKey(1)), agg_b.combined_type(SymbolKey(1)));
}

#[test]
fn overwriting_a_source_recomputes_the_combined_type() {
    let mut arena = TypeArena::new();
    let mut agg: InferredTypeAggregator<SymbolKey> = InferredTypeAggregator::new();
    agg.record(&mut arena, SymbolKey(1), SourceId(0), TypeId::INT);
    assert_eq!(agg.combined_type(SymbolKey(1)), Some(TypeId::INT));
    let changed = agg.record(&mut arena, SymbolKey(1), SourceId(0), TypeId::STR);
    assert!(changed);
    assert_eq!(agg.combined_type(SymbolKey(1)), Some(TypeId::STR));
}

#[test]
fn removing_the_only_source_returns_to_never() {
    let mut arena = TypeArena::new();
    let mut agg: InferredTypeAggregator<SymbolKey> = InferredTypeAggregator::new();
    agg.record(&mut arena, SymbolKey(1), SourceId(0), TypeId::INT);
    agg.remove_source(&mut arena, SymbolKey(1), SourceId(0));
    assert_eq!(agg.combined_type(SymbolKey(1)), Some(TypeId::NEVER));
}
