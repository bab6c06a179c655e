//! Exercises the direction loop end to end: multiple messages arriving in
//! one read, split and forwarded one at a time.

use std::sync::Arc;

use tokio::io::AsyncWriteExt;

use wayproxy_lib::io::{DirectionLoop, InMemorySink};
use wayproxy_lib::protocol::object::{ObjectEntry, ObjectTable};
use wayproxy_lib::protocol::registry::WL_DISPLAY;
use wayproxy_lib::protocol::state::ProtoState;
use wayproxy_lib::{Metrics, PassthroughFdMap, TracingLogger};

fn message(object_id: u32, opcode: u16, words: &[u32]) -> Vec<u8> {
    let len = 8 + words.len() * 4;
    let mut bytes = Vec::with_capacity(len);
    bytes.extend_from_slice(&object_id.to_le_bytes());
    let w1 = ((len as u32) << 16) | opcode as u32;
    bytes.extend_from_slice(&w1.to_le_bytes());
    for w in words {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    bytes
}

#[tokio::test]
async fn two_messages_in_one_write_are_forwarded_separately() {
    let mut objects = ObjectTable::new();
    objects.insert(ObjectEntry { id: 1, interface: &WL_DISPLAY }).unwrap();

    let mut fd_map = PassthroughFdMap;
    let mut sink = InMemorySink::default();
    let logger = TracingLogger;
    let metrics = Arc::new(Metrics::new());

    let (mut writer, reader) = tokio::io::duplex(512);

    let mut direction = DirectionLoop::new(
        reader,
        objects,
        ProtoState::new(),
        &mut fd_map,
        &mut sink,
        &logger,
        metrics.clone(),
        true,
        false,
    );

    // wl_display.sync(new_id=2) then wl_display.get_registry(new_id=3), back
    // to back in a single write.
    let mut combined = message(1, 0, &[2]);
    combined.extend(message(1, 1, &[3]));
    writer.write_all(&combined).await.unwrap();
    drop(writer);

    direction.run().await.unwrap();

    assert_eq!(sink.sent.len(), 2);
    assert_eq!(sink.sent[0].0, message(1, 0, &[2]));
    assert_eq!(sink.sent[1].0, message(1, 1, &[3]));
    assert_eq!(metrics.snapshot().messages_dispatched, 2);
}

#[tokio::test]
async fn partial_message_is_buffered_until_complete() {
    let mut objects = ObjectTable::new();
    objects.insert(ObjectEntry { id: 1, interface: &WL_DISPLAY }).unwrap();

    let mut fd_map = PassthroughFdMap;
    let mut sink = InMemorySink::default();
    let logger = TracingLogger;
    let metrics = Arc::new(Metrics::new());

    let (mut writer, reader) = tokio::io::duplex(512);

    let mut direction = DirectionLoop::new(
        reader,
        objects,
        ProtoState::new(),
        &mut fd_map,
        &mut sink,
        &logger,
        metrics.clone(),
        true,
        false,
    );

    let full = message(1, 0, &[2]);
    let first_chunk = full[..6].to_vec();
    let second_chunk = full[6..].to_vec();
    let writer_task = tokio::spawn(async move {
        writer.write_all(&first_chunk).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        writer.write_all(&second_chunk).await.unwrap();
        drop(writer);
    });

    direction.run().await.unwrap();
    writer_task.await.unwrap();

    assert_eq!(sink.sent.len(), 1);
    assert_eq!(sink.sent[0].0, full);
    assert_eq!(metrics.snapshot().messages_dispatched, 1);
}
