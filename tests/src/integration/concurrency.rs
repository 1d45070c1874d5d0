//! # Concurrency Integration Tests
//!
//! A host delivers from many I/O threads at once. These tests drive one
//! filter from scoped threads and check the outcome is the same as some
//! serial ordering of the same events.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    use domain_filter::test_utils::{member, message_from, ForwardedEvent, RecordingStage};
    use domain_filter::{
        ChannelInterceptor, ChannelMessage, Domain, DomainFilterInterceptor, FilterConfig, Member,
        MemberId, NextStage,
    };
    use rand::Rng;

    const THREADS: usize = 8;
    const DOMAIN: &[u8] = &[7];
    const OTHER: &[u8] = &[2];

    /// Recording stage whose first member-added forward parks until released.
    struct GatedStage {
        inner: RecordingStage,
        armed: AtomicBool,
        entered: Barrier,
        release: Barrier,
    }

    impl GatedStage {
        fn new(local: Member) -> Self {
            Self {
                inner: RecordingStage::new(local),
                armed: AtomicBool::new(true),
                entered: Barrier::new(2),
                release: Barrier::new(2),
            }
        }
    }

    impl NextStage for GatedStage {
        fn forward_message(&self, message: ChannelMessage) {
            self.inner.forward_message(message);
        }

        fn forward_member_added(&self, member: Member) {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.wait();
                self.release.wait();
            }
            self.inner.forward_member_added(member);
        }

        fn forward_member_disappeared(&self, member: Member) {
            self.inner.forward_member_disappeared(member);
        }

        fn local_member(&self, include_alive_time: bool) -> Member {
            self.inner.local_member(include_alive_time)
        }
    }

    /// Members the next stage currently believes present.
    fn net_members(events: &[ForwardedEvent]) -> HashSet<MemberId> {
        let mut present = HashSet::new();
        for event in events {
            match event {
                ForwardedEvent::MemberAdded(m) => {
                    present.insert(m.id.clone());
                }
                ForwardedEvent::MemberDisappeared(m) => {
                    present.remove(&m.id);
                }
                ForwardedEvent::Message(_) => {}
            }
        }
        present
    }

    fn shared_filter(
        log_interval: u32,
    ) -> (Arc<DomainFilterInterceptor<RecordingStage>>, Arc<RecordingStage>) {
        let stage = Arc::new(RecordingStage::new(member("local", DOMAIN)));
        let filter = Arc::new(DomainFilterInterceptor::new(
            FilterConfig::new(Domain::from(DOMAIN)).with_log_interval(log_interval),
            Arc::clone(&stage),
        ));
        (filter, stage)
    }

    #[test]
    fn test_distinct_concurrent_adds_all_land() {
        let (filter, stage) = shared_filter(100);
        let barrier = Barrier::new(THREADS);

        thread::scope(|s| {
            for i in 0..THREADS {
                let filter = &filter;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    filter.member_added(member(&format!("peer-{i}"), DOMAIN));
                });
            }
        });

        assert_eq!(filter.view_size(), THREADS + 1);
        assert_eq!(filter.members().len(), THREADS);
        assert_eq!(stage.added().len(), THREADS);
    }

    #[test]
    fn test_concurrent_duplicate_add_forwarded_once() {
        let (filter, stage) = shared_filter(100);
        let barrier = Barrier::new(THREADS);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let filter = &filter;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    filter.member_added(member("same-peer", DOMAIN));
                });
            }
        });

        assert_eq!(stage.added().len(), 1);
        let metrics = filter.metrics();
        assert_eq!(metrics.members_accepted, 1);
        assert_eq!(metrics.members_already_alive, (THREADS - 1) as u64);
    }

    #[test]
    fn test_racing_first_use_builds_one_view() {
        let (filter, stage) = shared_filter(100);
        let barrier = Barrier::new(THREADS);

        thread::scope(|s| {
            for i in 0..THREADS {
                let filter = &filter;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        filter.has_members();
                    } else {
                        filter.member_added(member(&format!("peer-{i}"), DOMAIN));
                    }
                });
            }
        });

        assert_eq!(stage.local_queries(), 1);
        assert_eq!(filter.view_size(), THREADS / 2 + 1);
    }

    #[test]
    fn test_concurrent_refusals_sample_exactly() {
        const EVENTS_PER_THREAD: usize = 1_000;
        let (filter, stage) = shared_filter(9);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let filter = &filter;
                s.spawn(move || {
                    for _ in 0..EVENTS_PER_THREAD {
                        filter.message_received(message_from("foreign", &[8]));
                    }
                });
            }
        });

        let metrics = filter.metrics();
        assert!(stage.events().is_empty());
        assert_eq!(metrics.messages_refused, (THREADS * EVENTS_PER_THREAD) as u64);
        // One emission per window of ten refusals.
        assert_eq!(metrics.warnings_emitted, (THREADS * EVENTS_PER_THREAD / 10) as u64);
    }

    #[test]
    fn test_mixed_traffic_forwards_only_own_domain() {
        const EVENTS_PER_THREAD: usize = 500;
        let (filter, stage) = shared_filter(50);

        let expected: usize = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let filter = &filter;
                    s.spawn(move || {
                        let mut rng = rand::thread_rng();
                        let mut same = 0usize;
                        for _ in 0..EVENTS_PER_THREAD {
                            let sender: u8 = rng.gen_range(6..=8);
                            if sender == DOMAIN[0] {
                                same += 1;
                            }
                            filter.message_received(message_from("peer", &[sender]));
                        }
                        same
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(stage.messages().len(), expected);
        assert!(stage
            .messages()
            .iter()
            .all(|m| m.sender.domain.as_bytes() == DOMAIN));
        let metrics = filter.metrics();
        assert_eq!(
            metrics.messages_forwarded + metrics.messages_refused,
            (THREADS * EVENTS_PER_THREAD) as u64
        );
    }

    #[test]
    fn test_add_and_remove_race_settles() {
        let (filter, stage) = shared_filter(100);

        thread::scope(|s| {
            for i in 0..THREADS {
                let filter = &filter;
                s.spawn(move || {
                    let peer = member(&format!("peer-{i}"), DOMAIN);
                    for _ in 0..100 {
                        filter.member_added(peer.clone());
                        filter.member_disappeared(peer.clone());
                    }
                    filter.member_added(peer);
                });
            }
        });

        assert_eq!(filter.view_size(), THREADS + 1);
        assert_eq!(stage.added().len(), THREADS * 101);
        assert_eq!(stage.disappeared().len(), THREADS * 100);
        for i in 0..THREADS {
            assert!(filter.member(&MemberId::from(format!("peer-{i}").as_str())).is_some());
        }
    }

    #[test]
    fn test_reconfigure_waits_for_in_flight_add() {
        let stage = Arc::new(GatedStage::new(member("local", DOMAIN)));
        let filter = DomainFilterInterceptor::new(
            FilterConfig::new(Domain::from(DOMAIN)),
            Arc::clone(&stage),
        );

        thread::scope(|s| {
            s.spawn(|| {
                filter.member_added(member("peer", DOMAIN));
            });
            stage.entered.wait();

            let reconfigure = s.spawn(|| filter.set_domain(OTHER.to_vec()));
            thread::sleep(Duration::from_millis(50));
            stage.release.wait();
            reconfigure.join().unwrap();
        });

        assert_eq!(
            stage.inner.events(),
            vec![
                ForwardedEvent::MemberAdded(member("peer", DOMAIN)),
                ForwardedEvent::MemberDisappeared(member("peer", DOMAIN)),
            ]
        );
        assert!(filter.members().is_empty());
        assert!(net_members(&stage.inner.events()).is_empty());
    }

    #[test]
    fn test_reconfigure_during_adds_keeps_stage_in_sync() {
        const ADDS_PER_THREAD: usize = 200;
        let (filter, stage) = shared_filter(100);
        let start = Barrier::new(THREADS + 1);

        thread::scope(|s| {
            for t in 0..THREADS {
                let filter = &filter;
                let start = &start;
                s.spawn(move || {
                    start.wait();
                    for i in 0..ADDS_PER_THREAD {
                        let domain = if i % 2 == 0 { DOMAIN } else { OTHER };
                        filter.member_added(member(&format!("peer-{t}-{i}"), domain));
                    }
                });
            }
            start.wait();
            filter.set_domain(OTHER.to_vec());
        });

        let in_view: HashSet<MemberId> = filter.members().into_iter().map(|m| m.id).collect();
        assert_eq!(net_members(&stage.events()), in_view);
        assert!(filter
            .members()
            .iter()
            .all(|m| m.domain.as_bytes() == OTHER));
    }
}
