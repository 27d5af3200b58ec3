use super::*;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(4, 10);
    let b = Span::new(0, 6);
    assert_eq!(a.merge(b), Span::new(0, 10));
}

#[test]
fn contains_span_is_inclusive_of_equal_bounds() {
    let outer = Span::new(0, 20);
    let inner = Span::new(5, 20);
    assert!(outer.contains_span(inner));
    assert!(!inner.contains_span(outer));
}

#[test]
fn dummy_span_round_trips() {
    let dummy = Span::dummy();
    assert!(dummy.is_dummy());
    assert!(!Span::new(0, 1).is_dummy());
}

#[test]
fn slice_extracts_text() {
    let text = "def f(x): pass";
    let span = Span::new(4, 5);
    assert_eq!(span.slice(text), "f");
}
