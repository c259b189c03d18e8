use recent_tokens::{
    token::ALPHABET, Error, MemoryStore, PeriodicProducer, Producer, ProducerState, RandSource,
    RecentStore, Token, TokenGenerator, ValuesConfig, ValuesService,
};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

/// Yields 0, 1, 2, ... so the n-th token starts with the n-th letter.
#[derive(Default)]
struct Counting {
    next: AtomicU64,
}

impl RandSource for Counting {
    fn next_u63(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

// The low chunk of each draw fills the last letter.
fn sequence_number(token: &Token) -> usize {
    let last = token.as_str().as_bytes()[token.as_str().len() - 1];
    ALPHABET.iter().position(|&b| b == last).unwrap()
}

fn counting_service() -> (ValuesService, Arc<dyn RecentStore>) {
    let config = ValuesConfig::builder()
        .tick_interval(Duration::from_millis(2))
        .key_format("%s%.9f")
        .build()
        .unwrap();

    let store: Arc<dyn RecentStore> = Arc::new(MemoryStore::new());
    let generator = TokenGenerator::with_source(Arc::new(Counting::default()), 6);
    let producer = PeriodicProducer::new(Arc::clone(&store), generator)
        .with_key_format(config.key_format())
        .unwrap();

    let service = ValuesService::from_parts(&config, Arc::new(producer), Arc::clone(&store));
    (service, store)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_observe_consistent_pairs_while_producing() {
    let (service, store) = counting_service();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            let done = Arc::clone(&done);
            tokio::spawn(async move {
                let mut observed = 0usize;
                while !done.load(Ordering::Acquire) {
                    match service.latest() {
                        Ok([older, newer]) => {
                            let (older, newer) = (sequence_number(&older), sequence_number(&newer));
                            // Equal only when two ticks landed on the same key.
                            assert!(newer == older + 1 || newer == older);
                            observed += 1;
                        }
                        Err(e) => assert_eq!(e, Error::InsufficientEntries),
                    }
                    tokio::task::yield_now().await;
                }
                observed
            })
        })
        .collect();

    let mut producer = service.start(CancellationToken::new()).unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    producer.stop().await;
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(service.producer_state(), ProducerState::Stopped);
    let len = store.len();
    assert!(len >= 2, "expected at least two ticks, got {len}");
    assert!(len < ALPHABET.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stopped_producer_leaves_a_fixed_pair() {
    let (service, store) = counting_service();
    let mut producer = service.start(CancellationToken::new()).unwrap();

    while store.len() < 3 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    producer.stop().await;

    let pair = service.latest().unwrap();
    let len = store.len();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(store.len(), len);
    assert_eq!(service.latest().unwrap(), pair);
    assert_eq!(service.latest().unwrap(), pair);
}

#[tokio::test]
async fn default_service_is_not_ready_until_two_ticks() {
    let service = ValuesService::new(ValuesConfig::default()).unwrap();
    assert_eq!(service.latest(), Err(Error::InsufficientEntries));

    let shutdown = CancellationToken::new();
    let mut producer = service.start(shutdown.clone()).unwrap();
    assert_eq!(
        service.start(shutdown.clone()).unwrap_err(),
        Error::AlreadyStarted
    );

    shutdown.cancel();
    producer.wait().await;
    assert_eq!(service.producer_state(), ProducerState::Stopped);
    assert_eq!(service.latest(), Err(Error::InsufficientEntries));
}

#[test]
fn producer_trait_object_is_usable() {
    let store: Arc<dyn RecentStore> = Arc::new(MemoryStore::new());
    let producer: Arc<dyn Producer> =
        Arc::new(PeriodicProducer::new(store, TokenGenerator::new(6)));
    assert_eq!(producer.state(), ProducerState::Idle);
}
