//! Turns two catalog snapshots into an ordered list of sync actions

use crate::fingerprint::TrackFingerprint;
use crate::history::RatingHistory;
use crate::matcher::{MatchCandidate, MatchEngine, MatchResult};
use crate::options::{ConflictPolicy, MatchConfig, SyncDirection, SyncItem, SyncOptions};
use crate::types::{MatchedPair, PlanStats, SkipReason, SyncAction, SyncPlan};
use plexsync_core::{CatalogSnapshot, Playlist, Track, TrackId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Matches scoring less than this far above the threshold are logged as low confidence
const LOW_CONFIDENCE_MARGIN: f64 = 10.0;

/// Computes the rating and playlist delta between a source and a target catalog
pub struct SyncPlanner {
    engine: MatchEngine,
    options: SyncOptions,
}

impl SyncPlanner {
    pub fn new(options: SyncOptions, match_config: MatchConfig) -> Self {
        Self {
            engine: MatchEngine::new(match_config),
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Plan a run. `direction` selects which snapshot is the source of truth.
    ///
    /// `plan(a, b, LocalToRemote)` and `plan(b, a, RemoteToLocal)` produce the same
    /// actions.
    pub fn plan(
        &self,
        local: &CatalogSnapshot,
        remote: &CatalogSnapshot,
        direction: SyncDirection,
    ) -> SyncPlan {
        self.plan_since(local, remote, direction, None)
    }

    /// Plan an incremental run.
    ///
    /// Source tracks whose rating equals the one in `history` propagate no rating. When
    /// playlists are not synced they are not matched at all. `None` plans a full run.
    pub fn plan_since(
        &self,
        local: &CatalogSnapshot,
        remote: &CatalogSnapshot,
        direction: SyncDirection,
        history: Option<&RatingHistory>,
    ) -> SyncPlan {
        let (source, target) = match direction {
            SyncDirection::LocalToRemote => (local, remote),
            SyncDirection::RemoteToLocal => (remote, local),
        };

        info!(
            "Planning {} ({} source tracks, {} target tracks)",
            direction,
            source.tracks.len(),
            target.tracks.len()
        );

        let targets = fingerprint_targets(&target.tracks);
        let source_playlists = PlaylistLookup::new(source);
        let target_playlists = PlaylistLookup::new(target);

        let mut stats = PlanStats::default();
        let mut actions = Vec::new();
        let mut matches = Vec::new();
        let mut claimed: HashSet<&TrackId> = HashSet::new();

        let sync_ratings = self.options.syncs(SyncItem::Tracks);
        let sync_playlists = self.options.syncs(SyncItem::Playlists);

        for track in &source.tracks {
            stats.source_tracks += 1;

            let unchanged = history.is_some_and(|history| history.is_unchanged(track));
            if unchanged {
                stats.unchanged += 1;
                if !sync_playlists {
                    continue;
                }
            }

            let Ok(fingerprint) = TrackFingerprint::from_track(track) else {
                debug!(track_id = %track.id, "Skipping track without a usable title");
                stats.unidentifiable += 1;
                actions.push(skip(track, SkipReason::Unidentifiable));
                continue;
            };

            let candidates = targets.iter().map(|(target, fp)| (*target, fp));
            let candidate = match self.engine.best_match(track, &fingerprint, candidates) {
                MatchResult::Matched(candidate) => candidate,
                MatchResult::NoMatch { best_score } => {
                    debug!(track = %track, best_score = ?best_score, "No match");
                    stats.unmatched += 1;
                    actions.push(skip(track, SkipReason::Unmatched));
                    continue;
                }
            };

            if !claimed.insert(&candidate.target.id) {
                debug!(
                    track = %track,
                    target_id = %candidate.target.id,
                    "Target already matched by an earlier track"
                );
                stats.duplicates += 1;
                actions.push(skip(track, SkipReason::DuplicateTarget));
                continue;
            }

            stats.matched += 1;
            self.log_match(&candidate);
            matches.push(MatchedPair {
                source: track.id.clone(),
                target: candidate.target.id.clone(),
                score: candidate.score,
            });

            if sync_ratings && !unchanged {
                actions.extend(self.plan_rating(&candidate));
            }

            if sync_playlists {
                plan_playlists(&candidate, &source_playlists, &target_playlists, &mut actions);
            }
        }

        info!(
            "Planned {} actions: {} matched, {} unmatched, {} unidentifiable, {} duplicates, {} unchanged",
            actions.len(),
            stats.matched,
            stats.unmatched,
            stats.unidentifiable,
            stats.duplicates,
            stats.unchanged
        );

        SyncPlan {
            direction,
            actions,
            matches,
            stats,
        }
    }

    fn log_match(&self, candidate: &MatchCandidate<'_>) {
        if candidate.score < self.engine.config().min_score + LOW_CONFIDENCE_MARGIN {
            warn!(
                source = %candidate.source,
                target = %candidate.target,
                score = candidate.score,
                "Low confidence match"
            );
        } else {
            debug!(
                source = %candidate.source,
                target = %candidate.target,
                score = candidate.score,
                "Matched"
            );
        }
    }

    fn plan_rating(&self, candidate: &MatchCandidate<'_>) -> Option<SyncAction> {
        // Unrated and zero-star source tracks have nothing to propagate
        let rating = candidate.source.rating.filter(|rating| !rating.is_zero())?;
        let current = candidate.target.rating;

        if current == Some(rating) {
            return None;
        }

        match (self.options.conflict_policy, current) {
            (ConflictPolicy::PreserveTarget, Some(existing)) if !existing.is_zero() => {
                debug!(track = %candidate.source, %rating, %existing, "Preserving target rating");
                Some(skip(
                    candidate.source,
                    SkipReason::ConflictingRating {
                        source: rating,
                        target: existing,
                    },
                ))
            }
            _ => Some(SyncAction::ApplyRating {
                track: candidate.target.clone(),
                rating,
                previous: current,
            }),
        }
    }
}

fn plan_playlists(
    candidate: &MatchCandidate<'_>,
    source_playlists: &PlaylistLookup<'_>,
    target_playlists: &PlaylistLookup<'_>,
    actions: &mut Vec<SyncAction>,
) {
    let source = candidate.source;
    let target = candidate.target;

    for playlist in source_playlists.containing(&source.id) {
        let present = target_playlists
            .get(&playlist.name)
            .is_some_and(|counterpart| counterpart.contains(&target.id));
        if !present {
            actions.push(SyncAction::AddToPlaylist {
                track: target.clone(),
                playlist: playlist.name.clone(),
            });
        }
    }

    for playlist in target_playlists.containing(&target.id) {
        let stale = source_playlists
            .get(&playlist.name)
            .is_some_and(|counterpart| !counterpart.contains(&source.id));
        if stale {
            actions.push(SyncAction::RemoveFromPlaylist {
                track: target.clone(),
                playlist: playlist.name.clone(),
            });
        }
    }
}

fn skip(track: &Track, reason: SkipReason) -> SyncAction {
    SyncAction::Skip {
        track: track.clone(),
        reason,
    }
}

/// Target tracks that can take part in matching, in enumeration order
fn fingerprint_targets(tracks: &[Track]) -> Vec<(&Track, TrackFingerprint)> {
    tracks
        .iter()
        .filter_map(|track| TrackFingerprint::from_track(track).ok().map(|fp| (track, fp)))
        .collect()
}

/// User playlists of one snapshot, paired by exact name.
///
/// When several playlists share a name, the first one enumerated is used.
struct PlaylistLookup<'a> {
    playlists: Vec<&'a Playlist>,
    by_name: HashMap<&'a str, &'a Playlist>,
}

impl<'a> PlaylistLookup<'a> {
    fn new(snapshot: &'a CatalogSnapshot) -> Self {
        let mut playlists = Vec::new();
        let mut by_name = HashMap::new();

        for playlist in snapshot.user_playlists() {
            if by_name.contains_key(playlist.name.as_str()) {
                warn!(playlist = %playlist.name, "Ignoring duplicate playlist name");
                continue;
            }
            by_name.insert(playlist.name.as_str(), playlist);
            playlists.push(playlist);
        }

        Self { playlists, by_name }
    }

    fn get(&self, name: &str) -> Option<&'a Playlist> {
        self.by_name.get(name).copied()
    }

    fn containing<'s>(&'s self, track: &'s TrackId) -> impl Iterator<Item = &'a Playlist> + 's {
        self.playlists
            .iter()
            .copied()
            .filter(move |playlist| playlist.contains(track))
    }
}
