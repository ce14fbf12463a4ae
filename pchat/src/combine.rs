//! Combines positional tool-call fragments into complete calls.
//!
//! ```rust
//! use pchat::combine_fragments;
//! use pprovider::ToolCallFragment;
//!
//! let calls = combine_fragments(&[
//!     ToolCallFragment::new(0).with_id("call_1").with_name("getWeather").with_arguments("{\"ci"),
//!     ToolCallFragment::new(0).with_arguments("ty\":\"Paris\"}"),
//! ]);
//!
//! assert_eq!(calls.len(), 1);
//! assert_eq!(calls[0].arguments, "{\"city\":\"Paris\"}");
//! ```

use std::collections::BTreeMap;

use pprovider::{ToolCall, ToolCallFragment};

/// Groups fragments by index and concatenates argument slices in arrival
/// order. The first non-empty id and name in a group win. Output is sorted
/// by ascending index.
pub fn combine_fragments(fragments: &[ToolCallFragment]) -> Vec<ToolCall> {
    let mut calls = BTreeMap::<u32, ToolCall>::new();

    for fragment in fragments {
        let call = calls
            .entry(fragment.index)
            .or_insert_with(|| ToolCall::new(fragment.index, String::new(), String::new()));

        if call.id.is_none()
            && let Some(id) = fragment.id.as_deref().filter(|id| !id.is_empty())
        {
            call.id = Some(id.to_string());
        }

        if call.name.is_empty()
            && let Some(name) = fragment.name.as_deref().filter(|name| !name.is_empty())
        {
            call.name = name.to_string();
        }

        call.arguments.push_str(&fragment.arguments);
    }

    calls.into_values().collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_input_yields_no_calls() {
        assert!(combine_fragments(&[]).is_empty());
    }

    #[test]
    fn weather_fragments_combine_into_one_call() {
        let calls = combine_fragments(&[
            ToolCallFragment::new(0)
                .with_id("call_1")
                .with_name("getWeather")
                .with_arguments("{\"ci"),
            ToolCallFragment::new(0).with_arguments("ty\":\"Paris\"}"),
        ]);

        assert_eq!(
            calls,
            vec![ToolCall::new(0, "getWeather", "{\"city\":\"Paris\"}").with_id("call_1")]
        );
    }

    #[test]
    fn interleaved_indices_are_grouped_and_sorted() {
        let calls = combine_fragments(&[
            ToolCallFragment::new(1).with_name("getTime").with_arguments("{"),
            ToolCallFragment::new(0).with_name("getWeather").with_arguments("{\"city\":"),
            ToolCallFragment::new(1).with_arguments("}"),
            ToolCallFragment::new(0).with_arguments("\"Oslo\"}"),
        ]);

        assert_eq!(
            calls,
            vec![
                ToolCall::new(0, "getWeather", "{\"city\":\"Oslo\"}"),
                ToolCall::new(1, "getTime", "{}"),
            ]
        );
    }

    #[test]
    fn later_ids_and_names_do_not_override_earlier_ones() {
        let calls = combine_fragments(&[
            ToolCallFragment::new(0).with_id(""),
            ToolCallFragment::new(0).with_id("call_a").with_name("first"),
            ToolCallFragment::new(0).with_id("call_b").with_name("second"),
        ]);

        assert_eq!(calls[0].id.as_deref(), Some("call_a"));
        assert_eq!(calls[0].name, "first");
    }

    #[test]
    fn group_without_arguments_still_yields_a_call() {
        let calls = combine_fragments(&[ToolCallFragment::new(2).with_name("getTime")]);

        assert_eq!(calls, vec![ToolCall::new(2, "getTime", "")]);
    }

    #[test]
    fn atomic_fragments_pass_through() {
        let calls = combine_fragments(&[ToolCallFragment::atomic(
            0,
            Some("call_0".to_string()),
            "setVolume",
            "{\"level\":40}",
        )]);

        assert_eq!(
            calls,
            vec![ToolCall::new(0, "setVolume", "{\"level\":40}").with_id("call_0")]
        );
    }

    #[test]
    fn escaped_and_non_ascii_arguments_survive_slicing() {
        let arguments = serde_json::json!({ "note": "say \"18°C\" \\ ok ✓" }).to_string();
        let pieces = split_at_offsets(&arguments, vec![3, 14, 15, 19, 27]);
        assert!(pieces.len() > 1);

        let fragments = pieces
            .into_iter()
            .map(|piece| ToolCallFragment::new(0).with_arguments(piece))
            .collect::<Vec<_>>();

        assert_eq!(combine_fragments(&fragments)[0].arguments, arguments);
    }

    /// Splits at byte offsets moved back to the nearest char boundary, the
    /// way a backend slices argument text between stream frames.
    fn split_at_offsets(text: &str, offsets: Vec<usize>) -> Vec<String> {
        let mut boundaries = offsets
            .into_iter()
            .filter(|offset| *offset > 0 && *offset < text.len())
            .map(|mut offset| {
                while !text.is_char_boundary(offset) {
                    offset -= 1;
                }
                offset
            })
            .filter(|offset| *offset > 0)
            .collect::<Vec<_>>();
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut pieces = Vec::new();
        let mut start = 0;
        for offset in boundaries {
            pieces.push(text[start..offset].to_string());
            start = offset;
        }
        pieces.push(text[start..].to_string());
        pieces
    }

    fn city_names() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Za-z ]{0,24}",
            "\\PC{0,16}",
            "[\"\\\\°é✓日\\n\\t ]{0,12}",
        ]
    }

    proptest! {
        #[test]
        fn any_split_reassembles_identically(
            city in city_names(),
            offsets in proptest::collection::vec(0usize..128, 0..8),
        ) {
            let arguments = serde_json::json!({ "city": city }).to_string();
            let pieces = split_at_offsets(&arguments, offsets);

            let fragments = pieces
                .iter()
                .enumerate()
                .map(|(position, piece)| {
                    let fragment = ToolCallFragment::new(0).with_arguments(piece.clone());
                    if position == 0 {
                        fragment.with_id("call_1").with_name("getWeather")
                    } else {
                        fragment
                    }
                })
                .collect::<Vec<_>>();

            let calls = combine_fragments(&fragments);
            prop_assert_eq!(
                calls,
                vec![ToolCall::new(0, "getWeather", arguments.clone()).with_id("call_1")]
            );
        }
    }
}
