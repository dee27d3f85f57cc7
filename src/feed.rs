// src/feed.rs
//
// The feed filter/sort engine. Operates on an in-memory snapshot of candidate
// posts fetched by the handler; every predicate here is authoritative, so a
// stale `is_expired` flag or a not-yet-swept expiration can never leak a post
// into the feed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo;
use crate::models::location::ViewerLocation;
use crate::models::post::{CategoryFilter, Post};
use crate::models::report::REPORT_THRESHOLD;

/// One feed query: search text, category filter, optional viewer location
/// and the radius in km. Built per request; the engine holds no state.
#[derive(Debug, Clone)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub category: CategoryFilter,
    pub viewer: Option<ViewerLocation>,
    pub radius_km: f64,
}

/// A post annotated with its distance from the viewer (0 when the viewer
/// shared no location).
#[derive(Debug, Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub post: Post,
    pub distance_km: f64,
}

/// Posts that must never surface: at or past the report threshold, flagged
/// expired, or past their expiration timestamp even if the sweep has not
/// flipped the flag yet.
fn excluded(post: &Post, now: DateTime<Utc>) -> bool {
    post.reports_count >= REPORT_THRESHOLD || post.is_expired || post.is_past_expiry(now)
}

/// Case-insensitive containment over title or description.
fn matches_search(post: &Post, search: &str) -> bool {
    let needle = search.to_lowercase();
    post.title.to_lowercase().contains(&needle)
        || post.description.to_lowercase().contains(&needle)
}

/// Filter, annotate and order a snapshot of candidate posts.
///
/// Predicates apply in order: exclusion, text, category, then radius when the
/// viewer's method carries a coordinate. Surviving posts are annotated with
/// their distance and stably sorted ascending on it, so equal distances keep
/// the snapshot's order. Re-running the query over the same snapshot always
/// yields the same sequence.
pub fn build_feed(candidates: Vec<Post>, query: &FeedQuery, now: DateTime<Utc>) -> Vec<FeedItem> {
    let viewer = query
        .viewer
        .filter(|viewer| viewer.method.has_coordinates());

    let mut items: Vec<FeedItem> = candidates
        .into_iter()
        .filter(|post| !excluded(post, now))
        .filter(|post| match query.search.as_deref() {
            Some(search) if !search.is_empty() => matches_search(post, search),
            _ => true,
        })
        .filter(|post| query.category.matches(post.category))
        .filter_map(|post| match viewer {
            Some(viewer) => {
                let distance_km = geo::distance_km(viewer.lat, viewer.lng, post.lat, post.lng);
                (distance_km <= query.radius_km).then_some(FeedItem { post, distance_km })
            }
            None => Some(FeedItem {
                post,
                distance_km: 0.0,
            }),
        })
        .collect();

    items.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    items
}
