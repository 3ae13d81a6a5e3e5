//! Tests for receiver lifecycle and delivery.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use minigram::{Message, Payload, Receiver, ReceiverConfig, ReceiverState, send};

#[test]
fn test_config_builder() {
    let config = ReceiverConfig::new("127.0.0.1", 8080).recv_buffer_size(32768);

    assert_eq!(config.address, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    assert_eq!(config.recv_buffer_size, 32768);
}

#[test]
fn test_config_defaults() {
    let config = ReceiverConfig::default();
    assert_eq!(config.address, "0.0.0.0");
    assert_eq!(config.port, 2020);
    assert_eq!(config.recv_buffer_size, 65535);
}

#[test]
fn test_any_address_config() {
    let config = ReceiverConfig::any_address(5000);
    assert_eq!(config.address, "0.0.0.0");
    assert_eq!(config.port, 5000);
    assert_eq!(config.bind_addr(), "0.0.0.0:5000");
}

#[test]
fn test_receiver_state_display() {
    assert_eq!(ReceiverState::Unbound.to_string(), "Unbound");
    assert_eq!(ReceiverState::Binding.to_string(), "Binding");
    assert_eq!(ReceiverState::Listening.to_string(), "Listening");
    assert_eq!(ReceiverState::Closing.to_string(), "Closing");
    assert_eq!(ReceiverState::Closed.to_string(), "Closed");
}

#[tokio::test]
async fn test_bind_ephemeral_port() {
    let receiver = Receiver::bind(ReceiverConfig::new("127.0.0.1", 0))
        .await
        .unwrap();

    assert!(receiver.is_listening());
    assert_eq!(receiver.state(), ReceiverState::Listening);
    assert_ne!(receiver.port(), 0);
    assert_eq!(receiver.address().to_string(), "127.0.0.1");
    assert_eq!(receiver.local_addr().port(), receiver.port());

    receiver.finish().await;
}

#[tokio::test]
async fn test_dual_delivery_callback_then_signal() {
    let delivered: Arc<parking_lot::Mutex<Vec<&'static str>>> =
        Arc::new(parking_lot::Mutex::new(Vec::new()));

    let callback_log = delivered.clone();
    let receiver = Receiver::bind_with(ReceiverConfig::new("127.0.0.1", 0), move |_msg| {
        callback_log.lock().push("callback");
    })
    .await
    .unwrap();

    let signal_log = delivered.clone();
    receiver.on_message(move |_msg| {
        signal_log.lock().push("signal");
    });

    send("ping", receiver.port(), "127.0.0.1").await.unwrap();

    for _ in 0..100 {
        if delivered.lock().len() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Both paths observe the datagram, callback first
    assert_eq!(*delivered.lock(), vec!["callback", "signal"]);

    receiver.finish().await;
}

#[tokio::test]
async fn test_multiple_datagrams() {
    let message_count = Arc::new(AtomicUsize::new(0));

    let count_clone = message_count.clone();
    let receiver = Receiver::bind_with(ReceiverConfig::new("127.0.0.1", 0), move |_msg| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    })
    .await
    .unwrap();

    for i in 0..5 {
        send(format!("Message {}", i), receiver.port(), "127.0.0.1")
            .await
            .unwrap();
    }

    for _ in 0..100 {
        if message_count.load(Ordering::SeqCst) >= 5 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(message_count.load(Ordering::SeqCst), 5);

    receiver.finish().await;
}

#[tokio::test]
async fn test_finish_releases_port() {
    let receiver = Receiver::bind(ReceiverConfig::new("127.0.0.1", 0))
        .await
        .unwrap();
    let port = receiver.port();

    receiver.finish().await;
    assert_eq!(receiver.state(), ReceiverState::Closed);

    // The port must be immediately rebindable
    let rebound = Receiver::bind(ReceiverConfig::new("127.0.0.1", port))
        .await
        .unwrap();
    assert_eq!(rebound.port(), port);

    rebound.finish().await;
}

#[tokio::test]
async fn test_double_finish() {
    let receiver = Receiver::bind(ReceiverConfig::new("127.0.0.1", 0))
        .await
        .unwrap();

    receiver.finish().await;
    receiver.finish().await;

    assert_eq!(receiver.state(), ReceiverState::Closed);
    assert!(!receiver.is_listening());
}

#[tokio::test]
async fn test_finish_disconnects_subscribers() {
    let receiver = Receiver::bind(ReceiverConfig::new("127.0.0.1", 0))
        .await
        .unwrap();

    receiver.on_message(|_| {});
    receiver.on_error(|_| {});
    assert_eq!(receiver.message.connection_count(), 1);
    assert_eq!(receiver.error.connection_count(), 1);

    receiver.finish().await;

    assert_eq!(receiver.message.connection_count(), 0);
    assert_eq!(receiver.error.connection_count(), 0);
}

#[tokio::test]
async fn test_bind_conflict() {
    let count = Arc::new(AtomicUsize::new(0));

    let count_clone = count.clone();
    let first = Receiver::bind_with(ReceiverConfig::new("127.0.0.1", 0), move |_msg| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    })
    .await
    .unwrap();

    // Second bind on the occupied port fails with the dedicated variant
    let conflict = Receiver::bind(ReceiverConfig::new("127.0.0.1", first.port())).await;
    match conflict {
        Err(e) => assert!(e.is_addr_in_use(), "unexpected error: {e}"),
        Ok(_) => panic!("expected bind conflict"),
    }

    // The first receiver keeps working
    send("still here", first.port(), "127.0.0.1").await.unwrap();

    for _ in 0..100 {
        if count.load(Ordering::SeqCst) >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);

    first.finish().await;
}

#[tokio::test]
async fn test_concurrent_receivers_independent() {
    let received_a: Arc<parking_lot::Mutex<Vec<Message>>> =
        Arc::new(parking_lot::Mutex::new(Vec::new()));
    let received_b: Arc<parking_lot::Mutex<Vec<Message>>> =
        Arc::new(parking_lot::Mutex::new(Vec::new()));

    let a_clone = received_a.clone();
    let receiver_a = Receiver::bind_with(ReceiverConfig::new("127.0.0.1", 0), move |msg| {
        a_clone.lock().push(msg.clone());
    })
    .await
    .unwrap();

    let b_clone = received_b.clone();
    let receiver_b = Receiver::bind_with(ReceiverConfig::new("127.0.0.1", 0), move |msg| {
        b_clone.lock().push(msg.clone());
    })
    .await
    .unwrap();

    send("for a", receiver_a.port(), "127.0.0.1").await.unwrap();
    send("for b", receiver_b.port(), "127.0.0.1").await.unwrap();

    for _ in 0..100 {
        if !received_a.lock().is_empty() && !received_b.lock().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let a = received_a.lock();
    let b = received_b.lock();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(a[0].payload, Payload::Text("for a".into()));
    assert_eq!(b[0].payload, Payload::Text("for b".into()));

    drop(a);
    drop(b);
    receiver_a.finish().await;
    receiver_b.finish().await;
}

#[tokio::test]
async fn test_message_metadata() {
    let received: Arc<parking_lot::Mutex<Vec<Message>>> =
        Arc::new(parking_lot::Mutex::new(Vec::new()));

    let received_clone = received.clone();
    let receiver = Receiver::bind_with(ReceiverConfig::new("127.0.0.1", 0), move |msg| {
        received_clone.lock().push(msg.clone());
    })
    .await
    .unwrap();

    // Send from a socket whose local address is known
    let sender = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let sender_addr = sender.local_addr().unwrap();
    let payload = b"hello there";
    sender.send_to(payload, receiver.local_addr()).await.unwrap();

    for _ in 0..100 {
        if !received.lock().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let messages = received.lock();
    assert_eq!(messages.len(), 1);
    let info = messages[0].info;
    assert_eq!(info.sender(), sender_addr);
    assert_eq!(info.receiver(), receiver.local_addr());
    assert_eq!(info.message_size, payload.len());

    drop(messages);
    receiver.finish().await;
}

#[tokio::test]
async fn test_drop_releases_port() {
    let receiver = Receiver::bind(ReceiverConfig::new("127.0.0.1", 0))
        .await
        .unwrap();
    let port = receiver.port();
    drop(receiver);

    // The loop task notices the dropped handle in the background
    let mut rebound = None;
    for _ in 0..100 {
        match Receiver::bind(ReceiverConfig::new("127.0.0.1", port)).await {
            Ok(r) => {
                rebound = Some(r);
                break;
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }

    let rebound = rebound.expect("port was not released after drop");
    rebound.finish().await;
}

#[tokio::test]
async fn test_signal_subscription_management() {
    let receiver = Receiver::bind(ReceiverConfig::new("127.0.0.1", 0))
        .await
        .unwrap();

    let id_a = receiver.on_message(|_| {});
    let id_b = receiver.on_message(|_| {});
    assert_eq!(receiver.message.connection_count(), 2);

    assert!(receiver.message.disconnect(id_a));
    assert!(!receiver.message.disconnect(id_a));
    assert_eq!(receiver.message.connection_count(), 1);

    assert!(receiver.message.disconnect(id_b));
    assert_eq!(receiver.message.connection_count(), 0);

    receiver.finish().await;
}
