use super::*;

#[test]
fn short_text_is_a_single_line() {
    assert_eq!(wrap("hello there", 26), vec!["hello there"]);
}

#[test]
fn breaks_at_last_space_within_budget() {
    assert_eq!(
        wrap("the quick brown fox jumps", 10),
        vec!["the quick", "brown fox", "jumps"]
    );
}

#[test]
fn space_exactly_at_budget_is_a_break_point() {
    // "abcde fghij": the space sits at offset 5 == cursor + width.
    assert_eq!(wrap("abcde fghij", 5), vec!["abcde", "fghij"]);
}

#[test]
fn long_word_is_hard_split() {
    assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    assert_eq!(
        wrap("hi supercalifragilistic", 5),
        vec!["hi", "super", "calif", "ragil", "istic"]
    );
}

#[test]
fn leading_spaces_are_skipped() {
    assert_eq!(wrap("   aaa bbb", 4), vec!["aaa", "bbb"]);
}

#[test]
fn empty_and_blank_input_yield_nothing() {
    assert!(wrap("", 10).is_empty());
    assert!(wrap("     ", 3).is_empty());
}

#[test]
fn zero_width_is_clamped_to_one() {
    assert_eq!(wrap("ab c", 0), vec!["a", "b", "c"]);
}

#[test]
fn multibyte_text_splits_on_char_boundaries() {
    assert_eq!(wrap("ééééé", 2), vec!["éé", "éé", "é"]);
    assert_eq!(wrap("😀😀 😀", 2), vec!["😀😀", "😀"]);
}

#[test]
fn lines_respect_budget_for_ordinary_words() {
    let text = "it was the best of times it was the worst of times it was the age of wisdom";
    for width in 5..30 {
        for line in wrap(text, width) {
            assert!(line.chars().count() <= width, "{line:?} exceeds {width}");
        }
    }
}

#[test]
fn rejoined_lines_reproduce_the_input() {
    let text = "we few we happy few we band of brothers";
    for width in 8..20 {
        assert_eq!(wrap(text, width).join(" "), text);
    }
}

#[test]
fn rewrapping_rejoined_output_is_idempotent() {
    let text = "a monologue that rambles on about nothing in particular for a while";
    for width in [10usize, 13, 17, 26] {
        let first = wrap(text, width);
        let second = wrap(&first.join(" "), width);
        assert_eq!(first, second, "width {width}");
    }
}
