mod common;

use common::{sample_catalogs, stars, track, InMemoryCatalog};
use plexsync_core::{CatalogReader, CatalogSnapshot, Track, TrackId};
use plexsync_engine::{
    MatchConfig, RatingHistory, SkipReason, SyncAction, SyncDirection, SyncExecutor, SyncItem,
    SyncOptions, SyncPlan, SyncPlanner,
};
use std::collections::BTreeSet;

fn all_items() -> SyncOptions {
    SyncOptions {
        sync_items: SyncItem::parse_list(["tracks", "playlists"]).unwrap(),
        ..SyncOptions::default()
    }
}

fn planner() -> SyncPlanner {
    SyncPlanner::new(all_items(), MatchConfig::default())
}

fn snapshot(catalog: &InMemoryCatalog) -> CatalogSnapshot {
    catalog.snapshot().unwrap()
}

fn add(track: &Track, playlist: &str) -> SyncAction {
    SyncAction::AddToPlaylist {
        track: track.clone(),
        playlist: playlist.to_string(),
    }
}

fn remove(track: &Track, playlist: &str) -> SyncAction {
    SyncAction::RemoveFromPlaylist {
        track: track.clone(),
        playlist: playlist.to_string(),
    }
}

#[test]
fn test_plan_local_to_remote() {
    let (local, remote) = sample_catalogs();
    let plan = planner().plan(&snapshot(&local), &snapshot(&remote), SyncDirection::LocalToRemote);

    assert_eq!(
        plan.actions,
        vec![
            SyncAction::ApplyRating {
                track: remote.track("r1").clone(),
                rating: stars(4.0),
                previous: None,
            },
            add(remote.track("r1"), "Favourites"),
            add(remote.track("r1"), "Sixties"),
            add(remote.track("r3"), "Sixties"),
            SyncAction::ApplyRating {
                track: remote.track("r4").clone(),
                rating: stars(4.5),
                previous: Some(stars(2.0)),
            },
            add(remote.track("r4"), "Favourites"),
            SyncAction::Skip {
                track: local.track("l4").clone(),
                reason: SkipReason::Unmatched,
            },
            SyncAction::Skip {
                track: local.track("l5").clone(),
                reason: SkipReason::Unidentifiable,
            },
        ]
    );

    assert_eq!(plan.stats.source_tracks, 5);
    assert_eq!(plan.stats.matched, 3);
    assert_eq!(plan.stats.unmatched, 1);
    assert_eq!(plan.stats.unidentifiable, 1);
}

#[test]
fn test_plan_remote_to_local_mirrors_rating_source() {
    let (local, remote) = sample_catalogs();
    let plan = planner().plan(&snapshot(&local), &snapshot(&remote), SyncDirection::RemoteToLocal);

    assert_eq!(
        plan.actions,
        vec![
            remove(local.track("l1"), "Favourites"),
            SyncAction::Skip {
                track: remote.track("r2").clone(),
                reason: SkipReason::Unmatched,
            },
            SyncAction::ApplyRating {
                track: local.track("l3").clone(),
                rating: stars(2.0),
                previous: Some(stars(4.5)),
            },
            remove(local.track("l3"), "Favourites"),
            SyncAction::Skip {
                track: remote.track("r5").clone(),
                reason: SkipReason::Unmatched,
            },
        ]
    );
}

fn pairs(plan: &SyncPlan) -> BTreeSet<(String, String)> {
    plan.matches
        .iter()
        .map(|pair| (pair.source.to_string(), pair.target.to_string()))
        .collect()
}

#[test]
fn test_directional_symmetry() {
    let (local, remote) = sample_catalogs();
    let (a, b) = (snapshot(&local), snapshot(&remote));

    let forward = planner().plan(&a, &b, SyncDirection::LocalToRemote);
    let reverse = planner().plan(&a, &b, SyncDirection::RemoteToLocal);

    // Same pairs, seen from the other side
    let mirrored: BTreeSet<(String, String)> = pairs(&reverse)
        .into_iter()
        .map(|(source, target)| (target, source))
        .collect();
    assert_eq!(pairs(&forward), mirrored);
    assert_eq!(
        pairs(&forward),
        BTreeSet::from([
            ("l1".to_string(), "r1".to_string()),
            ("l2".to_string(), "r3".to_string()),
            ("l3".to_string(), "r4".to_string()),
        ])
    );

    // Each direction propagates its own source's rating over the same pair
    let rating_for = |plan: &SyncPlan, id: &str| {
        plan.actions.iter().find_map(|action| match action {
            SyncAction::ApplyRating { track, rating, .. } if track.id.as_str() == id => Some(*rating),
            _ => None,
        })
    };
    assert_eq!(rating_for(&forward, "r4"), local.track("l3").rating);
    assert_eq!(rating_for(&reverse, "l3"), remote.track("r4").rating);
}

#[test]
fn test_replanning_without_writes_is_identical() {
    let planner = planner();

    for direction in [SyncDirection::LocalToRemote, SyncDirection::RemoteToLocal] {
        let (mut local, mut remote) = sample_catalogs();

        let first = planner.plan(&snapshot(&local), &snapshot(&remote), direction);
        let target = match direction {
            SyncDirection::LocalToRemote => &mut remote,
            SyncDirection::RemoteToLocal => &mut local,
        };
        let summary = SyncExecutor::new(true).execute(&first, target);
        assert!(summary.dry_run);
        assert_eq!(local.writes + remote.writes, 0);

        let second = planner.plan(&snapshot(&local), &snapshot(&remote), direction);
        assert_eq!(first, second, "{direction}");
    }
}

#[test]
fn test_plan_converges_after_live_writes() {
    let (local, mut remote) = sample_catalogs();
    let planner = planner();

    let plan = planner.plan(&snapshot(&local), &snapshot(&remote), SyncDirection::LocalToRemote);
    let summary = SyncExecutor::new(false).execute(&plan, &mut remote);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.applied, 6);

    let replan = planner.plan(&snapshot(&local), &snapshot(&remote), SyncDirection::LocalToRemote);
    assert_eq!(replan.writes().count(), 0);
    assert_eq!(replan.skips().count(), 2);
}

#[test]
fn test_incremental_plan_only_propagates_changed_ratings() {
    let (mut local, remote) = sample_catalogs();
    let tracks_only = SyncPlanner::new(SyncOptions::default(), MatchConfig::default());
    let history = RatingHistory::capture(&snapshot(&local));

    // Nothing changed since the history was taken
    let plan = tracks_only.plan_since(
        &snapshot(&local),
        &snapshot(&remote),
        SyncDirection::LocalToRemote,
        Some(&history),
    );
    assert!(plan.actions.is_empty());
    assert_eq!(plan.stats.unchanged, 5);
    assert_eq!(plan.stats.matched, 0);

    local.tracks[1].rating = Some(stars(3.0));
    let plan = tracks_only.plan_since(
        &snapshot(&local),
        &snapshot(&remote),
        SyncDirection::LocalToRemote,
        Some(&history),
    );
    assert_eq!(
        plan.actions,
        vec![SyncAction::ApplyRating {
            track: remote.track("r3").clone(),
            rating: stars(3.0),
            previous: Some(stars(5.0)),
        }]
    );
    assert_eq!(plan.stats.unchanged, 4);

    // Without history every rating is considered
    let full = tracks_only.plan(&snapshot(&local), &snapshot(&remote), SyncDirection::LocalToRemote);
    assert_eq!(full.writes().count(), 3);
}

#[test]
fn test_incremental_plan_still_syncs_playlists() {
    let (local, remote) = sample_catalogs();
    let history = RatingHistory::capture(&snapshot(&local));

    let plan = planner().plan_since(
        &snapshot(&local),
        &snapshot(&remote),
        SyncDirection::LocalToRemote,
        Some(&history),
    );

    assert!(plan
        .writes()
        .all(|action| matches!(action, SyncAction::AddToPlaylist { .. })));
    assert_eq!(plan.writes().count(), 4);
    assert_eq!(plan.stats.matched, 3);
    assert_eq!(plan.stats.unchanged, 5);
}

#[test]
fn test_no_spurious_writes_when_ratings_agree() {
    let local = InMemoryCatalog::new(
        "local",
        vec![track("l1", "Yesterday", "The Beatles", 125).with_rating(stars(3.5))],
    );
    let remote = InMemoryCatalog::new(
        "remote",
        vec![track("r1", "Yesterday", "Beatles, The", 126).with_rating(stars(3.5))],
    );

    let plan = planner().plan(&snapshot(&local), &snapshot(&remote), SyncDirection::LocalToRemote);
    assert!(plan.actions.is_empty());
    assert_eq!(plan.stats.matched, 1);
}

#[test]
fn test_unmatched_track_contributes_only_a_skip() {
    let local = InMemoryCatalog::new(
        "local",
        vec![track("l1", "Something Else Entirely", "Band", 100).with_rating(stars(5.0))],
    )
    .with_playlists(vec![plexsync_core::Playlist::new("Mix").with_tracks(["l1"])]);
    let remote = InMemoryCatalog::new("remote", vec![track("r1", "Yesterday", "The Beatles", 125)]);

    let plan = planner().plan(&snapshot(&local), &snapshot(&remote), SyncDirection::LocalToRemote);
    assert_eq!(
        plan.actions,
        vec![SyncAction::Skip {
            track: local.track("l1").clone(),
            reason: SkipReason::Unmatched,
        }]
    );
}

#[test]
fn test_threshold_boundary() {
    // One substitution over eight characters: title score 87.5
    let local = InMemoryCatalog::new(
        "local",
        vec![Track::new(TrackId::new("l1"), "abc defg").with_rating(stars(2.0))],
    );
    let remote = InMemoryCatalog::new("remote", vec![Track::new(TrackId::new("r1"), "abc defx")]);

    let config = |min_score| MatchConfig {
        title_weight: 1.0,
        artist_weight: 0.0,
        min_score,
        ..MatchConfig::default()
    };

    let plan = SyncPlanner::new(all_items(), config(87.5)).plan(
        &snapshot(&local),
        &snapshot(&remote),
        SyncDirection::LocalToRemote,
    );
    assert_eq!(plan.stats.matched, 1);
    assert_eq!(plan.writes().count(), 1);

    let plan = SyncPlanner::new(all_items(), config(88.5)).plan(
        &snapshot(&local),
        &snapshot(&remote),
        SyncDirection::LocalToRemote,
    );
    assert_eq!(plan.stats.unmatched, 1);
    assert_eq!(plan.writes().count(), 0);
}

#[test]
fn test_let_it_be_end_to_end() {
    let local = InMemoryCatalog::new(
        "local",
        vec![track("src", "Let It Be", "The Beatles", 243).with_rating(stars(4.0))],
    );
    let remote = InMemoryCatalog::new(
        "remote",
        vec![
            track("target1", "let it be", "Beatles, The", 243),
            track("target2", "Let It Be (Remastered)", "The Beatles", 240),
        ],
    );

    let options = SyncOptions::default();
    let plan = SyncPlanner::new(options, MatchConfig::default()).plan(
        &snapshot(&local),
        &snapshot(&remote),
        SyncDirection::LocalToRemote,
    );

    assert_eq!(
        plan.actions,
        vec![SyncAction::ApplyRating {
            track: remote.track("target1").clone(),
            rating: stars(4.0),
            previous: None,
        }]
    );
}
