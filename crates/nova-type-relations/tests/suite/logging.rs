use std::{
    io,
    sync::{Arc, Mutex},
};

use nova_type_relations::{TypeError, TypeRelations};
use nova_types::{TyContext, Type};
use tracing_subscriber::fmt::MakeWriter;

use super::fixtures::Fixture;

#[derive(Clone, Default)]
struct SharedLogBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedLogBuffer {
    fn as_string(&self) -> String {
        let bytes = self.0.lock().expect("log buffer mutex poisoned");
        String::from_utf8_lossy(&bytes).to_string()
    }
}

struct SharedLogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = self.0.lock().expect("log buffer mutex poisoned");
        out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedLogBuffer {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(self.0.clone())
    }
}

fn capture_logs<R>(level: tracing::Level, f: impl FnOnce() -> R) -> (R, String) {
    let logs = SharedLogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_max_level(level)
        .with_writer(logs.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.as_string())
}

#[test]
fn exceeding_the_depth_limit_warns() {
    let fx = Fixture::new();
    let relations = TypeRelations::builder().max_depth(4).build().unwrap();

    let (result, logs) = capture_logs(tracing::Level::WARN, || {
        relations.is_subtype(
            &fx.store,
            &fx.array_list_of(fx.string()),
            &fx.ty("java.lang.Iterable", vec![fx.string()]),
        )
    });
    assert_eq!(
        result,
        Err(TypeError::RecursionLimit {
            operation: "is_subtype",
            limit: 4,
        })
    );
    assert!(
        logs.contains("type relation exceeded the recursion limit"),
        "expected a depth warning, got logs:\n{logs}"
    );
    assert!(logs.contains("nova.types"), "logs:\n{logs}");
    assert!(logs.contains("limit=4"), "logs:\n{logs}");
}

#[test]
fn successful_queries_do_not_warn() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();

    let (result, logs) = capture_logs(tracing::Level::WARN, || {
        relations.is_subtype(
            &fx.store,
            &fx.array_list_of(fx.string()),
            &fx.ty("java.lang.Iterable", vec![fx.string()]),
        )
    });
    assert_eq!(result, Ok(true));
    assert!(logs.is_empty(), "unexpected logs:\n{logs}");
}

#[test]
fn unchecked_conversions_are_logged_at_debug() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let raw = fx.ty("java.util.ArrayList", vec![]);
    let target = fx.list_of(fx.string());

    let (result, logs) = capture_logs(tracing::Level::DEBUG, || {
        relations.is_subtype_unchecked(&fx.store, &raw, &target)
    });
    assert_eq!(result, Ok(true));
    assert!(logs.contains("unchecked conversion"), "logs:\n{logs}");
    assert!(logs.contains("List<String>"), "logs:\n{logs}");

    // Plain subtyping never takes the unchecked path.
    let (result, logs) = capture_logs(tracing::Level::DEBUG, || {
        relations.is_subtype(&fx.store, &raw, &target)
    });
    assert_eq!(result, Ok(false));
    assert!(!logs.contains("unchecked conversion"), "logs:\n{logs}");
}

#[test]
fn failed_lower_bounds_are_logged_at_debug() {
    let fx = Fixture::new();
    let relations = TypeRelations::new();
    let mut cx = TyContext::new(&fx.store);

    let (result, logs) = capture_logs(tracing::Level::DEBUG, || {
        relations.glb(&mut cx, &fx.string(), &fx.integer())
    });
    assert_eq!(result, Ok(Type::Error));
    assert!(logs.contains("no greatest lower bound"), "logs:\n{logs}");
}

#[test]
fn closure_cache_flushes_are_logged_at_debug() {
    let fx = Fixture::new();
    let relations = TypeRelations::builder()
        .closure_cache_capacity(1)
        .build()
        .unwrap();

    let (_, logs) = capture_logs(tracing::Level::DEBUG, || {
        relations.closure(&fx.store, &fx.string()).unwrap();
        relations.closure(&fx.store, &fx.integer()).unwrap();
    });
    assert!(
        logs.contains("flushing supertype closure cache"),
        "logs:\n{logs}"
    );
    assert!(relations.cached_closures() <= 1);
}
