//! Domain Membership View
//!
//! The set of peers currently believed alive within one domain, seeded with
//! the local node.
//!
//! The view is a plain data structure with `&mut self` mutators. The filter
//! owns it behind a single mutex, so the "check domain, then merge" sequence
//! is one critical section and two concurrent adds of the same member cannot
//! both observe it as new.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::{Domain, Member, MemberId};

/// A tracked peer plus the last time it was heard from.
#[derive(Debug, Clone)]
struct MemberEntry {
    member: Member,
    last_heard: Instant,
}

impl MemberEntry {
    fn new(member: Member) -> Self {
        Self {
            member,
            last_heard: Instant::now(),
        }
    }

    /// Copy the fields that change between announcements.
    fn refresh(&mut self, update: &Member) {
        self.member.alive_time_ms = update.alive_time_ms;
        self.member.liveness = update.liveness;
        self.member.payload.clone_from(&update.payload);
        self.member.command.clone_from(&update.command);
        self.last_heard = Instant::now();
    }
}

/// Membership restricted to one domain.
#[derive(Debug, Clone)]
pub struct DomainMembershipView {
    local: Member,
    members: HashMap<MemberId, MemberEntry>,
}

impl DomainMembershipView {
    /// Create a view containing only `local`.
    pub fn new(local: Member) -> Self {
        Self {
            local,
            members: HashMap::new(),
        }
    }

    pub fn local(&self) -> &Member {
        &self.local
    }

    /// Merge a liveness announcement.
    ///
    /// Returns `true` when this is a topology change: the member was absent,
    /// or was known but not alive and is alive now. Re-announcing an
    /// already-alive member only refreshes its fields and returns `false`.
    /// Announcements for the local node are ignored.
    pub fn merge_alive(&mut self, member: &Member) -> bool {
        if member.id == self.local.id {
            return false;
        }

        match self.members.get_mut(&member.id) {
            None => {
                self.members
                    .insert(member.id.clone(), MemberEntry::new(member.clone()));
                true
            }
            Some(entry) => {
                let was_alive = entry.member.is_alive();
                entry.refresh(member);
                !was_alive && member.is_alive()
            }
        }
    }

    /// Remove a member. No-op when absent.
    pub fn remove(&mut self, id: &MemberId) -> Option<Member> {
        self.members.remove(id).map(|entry| entry.member)
    }

    /// Whether any peer other than the local node is tracked.
    pub fn has_members(&self) -> bool {
        !self.members.is_empty()
    }

    /// Number of tracked peers, excluding the local node.
    pub fn peer_count(&self) -> usize {
        self.members.len()
    }

    /// Size of the view, including the local node.
    pub fn len(&self) -> usize {
        self.members.len() + 1
    }

    /// The view always holds the local node, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        id == &self.local.id || self.members.contains_key(id)
    }

    /// Snapshot of the tracked peers, longest-lived first.
    pub fn members(&self) -> Vec<Member> {
        let mut snapshot: Vec<Member> = self
            .members
            .values()
            .map(|entry| entry.member.clone())
            .collect();
        snapshot.sort_by(|a, b| {
            b.alive_time_ms
                .cmp(&a.alive_time_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        snapshot
    }

    /// Look up a tracked peer by identity.
    pub fn member(&self, id: &MemberId) -> Option<Member> {
        self.members.get(id).map(|entry| entry.member.clone())
    }

    /// Remove and return peers not heard from within `max_age`.
    pub fn expire(&mut self, max_age: Duration) -> Vec<Member> {
        let now = Instant::now();
        self.remove_where(|entry| now.saturating_duration_since(entry.last_heard) >= max_age)
    }

    /// Remove and return peers not tagged with `domain`.
    pub fn retain_domain(&mut self, domain: &Domain) -> Vec<Member> {
        self.remove_where(|entry| !entry.member.in_domain(domain))
    }

    fn remove_where<F>(&mut self, predicate: F) -> Vec<Member>
    where
        F: Fn(&MemberEntry) -> bool,
    {
        let doomed: Vec<MemberId> = self
            .members
            .iter()
            .filter(|(_, entry)| predicate(entry))
            .map(|(id, _)| id.clone())
            .collect();

        doomed
            .iter()
            .filter_map(|id| self.members.remove(id))
            .map(|entry| entry.member)
            .collect()
    }
}
