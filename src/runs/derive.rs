//! Per-row derivations.
//!
//! Pure functions of a run's own fields: calling them twice with the same
//! input yields identical strings.

use super::filter::{FilterKind, FilterToken};
use super::model::Tag;

/// Short human identity: the first `-` segment of the id.
///
/// For uuid-shaped ids this is the leading 8 hex digits; ids without a `-`
/// are returned whole. The row column clips what does not fit.
pub fn title_for_run(run_id: &str) -> &str {
    run_id.split('-').next().unwrap_or(run_id)
}

/// Route of the pipeline definition pinned to a snapshot
pub fn pipeline_link(pipeline_name: &str, snapshot_id: &str) -> String {
    format!("/pipeline/{}@{}/", pipeline_name, snapshot_id)
}

/// Route of the run detail page
pub fn run_link(pipeline_name: &str, run_id: &str) -> String {
    format!("/runs/{}/{}", pipeline_name, run_id)
}

/// `tag` token with `key=value`, unescaped
pub fn tag_filter_token(tag: &Tag) -> FilterToken {
    FilterToken::new(
        FilterKind::Tag.as_str(),
        format!("{}={}", tag.key, tag.value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_uses_first_uuid_segment() {
        assert_eq!(
            title_for_run("f0a1b2c3-1111-4000-8000-000000000001"),
            "f0a1b2c3"
        );
    }

    #[test]
    fn test_title_short_and_long_ids() {
        assert_eq!(title_for_run("abc123"), "abc123");
        assert_eq!(title_for_run("0123456789abcdef"), "0123456789abcdef");
        assert_eq!(title_for_run(""), "");
        assert_eq!(title_for_run("é-rest"), "é");
    }

    #[test]
    fn test_pipeline_link() {
        assert_eq!(pipeline_link("p", "s1"), "/pipeline/p@s1/");
    }

    #[test]
    fn test_run_link() {
        assert_eq!(run_link("p", "abc123"), "/runs/p/abc123");
    }

    #[test]
    fn test_tag_filter_token() {
        let tag = Tag::new("dagster/pipeline", "etl");
        assert_eq!(
            tag_filter_token(&tag),
            FilterToken::new("tag", "dagster/pipeline=etl")
        );
    }

    #[test]
    fn test_tag_filter_token_does_not_escape() {
        let tag = Tag::new("k", "a=b");
        assert_eq!(tag_filter_token(&tag).value, "k=a=b");
    }

    #[test]
    fn test_derivations_are_idempotent() {
        let tag = Tag::new("owner", "data");
        assert_eq!(pipeline_link("p", "s"), pipeline_link("p", "s"));
        assert_eq!(run_link("p", "r"), run_link("p", "r"));
        assert_eq!(tag_filter_token(&tag), tag_filter_token(&tag));
    }
}
