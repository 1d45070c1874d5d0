//! # Domain Filter Benchmarks
//!
//! Every inbound message passes through the filter, so the message path is
//! the one that matters:
//!
//! | Path | Expected cost |
//! |------|---------------|
//! | Same-domain message | one read lock plus a byte compare |
//! | Foreign message | the above plus one atomic update |
//! | Member added | one mutex plus a hash lookup |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use domain_filter::{
    ChannelInterceptor, ChannelMessage, Domain, DomainFilterInterceptor, FilterConfig, Member,
    NextStage,
};
use rand::Rng;

/// Next stage that discards everything.
struct NullStage(Member);

impl NextStage for NullStage {
    fn forward_message(&self, message: ChannelMessage) {
        black_box(message);
    }

    fn forward_member_added(&self, member: Member) {
        black_box(member);
    }

    fn forward_member_disappeared(&self, member: Member) {
        black_box(member);
    }

    fn local_member(&self, _include_alive_time: bool) -> Member {
        self.0.clone()
    }
}

fn create_filter(domain: &[u8]) -> DomainFilterInterceptor<NullStage> {
    let domain = Domain::from(domain);
    let local = Member::new("local", domain.clone());
    DomainFilterInterceptor::new(FilterConfig::new(domain), Arc::new(NullStage(local)))
}

fn bench_message_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain-filter-messages");
    group.measurement_time(Duration::from_secs(5));

    for len in [4usize, 16, 64] {
        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let filter = create_filter(&bytes);

        let same = ChannelMessage::new(
            Member::new("peer", Domain::new(bytes.clone())),
            vec![0; 256],
        );
        let mut other = bytes.clone();
        other[len - 1] ^= 0xFF;
        let foreign = ChannelMessage::new(Member::new("peer", Domain::new(other)), vec![0; 256]);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("same_domain", len), &same, |b, message| {
            b.iter(|| black_box(filter.message_received(message.clone())))
        });
        group.bench_with_input(
            BenchmarkId::new("foreign_domain", len),
            &foreign,
            |b, message| b.iter(|| black_box(filter.message_received(message.clone()))),
        );
    }

    group.finish();
}

fn bench_membership_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain-filter-membership");

    for peers in [10usize, 100, 1_000] {
        let filter = create_filter(&[1, 2, 3]);
        for i in 0..peers {
            let peer = Member::new(format!("peer-{i}").as_str(), Domain::new(vec![1, 2, 3]));
            filter.member_added(peer);
        }
        let known = Member::new("peer-0", Domain::new(vec![1, 2, 3]));

        group.bench_with_input(BenchmarkId::new("already_alive", peers), &known, |b, member| {
            b.iter(|| black_box(filter.member_added(member.clone())))
        });
        group.bench_function(BenchmarkId::new("snapshot", peers), |b| {
            b.iter(|| black_box(filter.members()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_message_path, bench_membership_path);
criterion_main!(benches);
