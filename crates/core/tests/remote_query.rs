use futures::{SinkExt, StreamExt};
use gremlab_api::GraphValue;
use gremlab_core::{By, GremlabError, QueryResultAdapter, get_traversal};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Frames to send back for one request, or `None` to drop the connection.
type Handler = dyn Fn(&Value) -> Option<Vec<Value>> + Send + Sync;

/// Starts a loopback Gremlin server on its own thread and returns its port.
fn spawn_server(handler: Arc<Handler>) -> u16 {
    spawn_counting_server(handler).0
}

/// Like `spawn_server`, also counting the WebSocket sessions it accepted.
fn spawn_counting_server(handler: Arc<Handler>) -> (u16, Arc<AtomicUsize>) {
    let sessions = Arc::new(AtomicUsize::new(0));
    let accepted = sessions.clone();
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("server runtime");
        rt.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            tx.send(listener.local_addr().expect("addr").port())
                .expect("report port");
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let handler = handler.clone();
                let accepted = accepted.clone();
                tokio::spawn(async move {
                    let Ok(mut ws) = accept_async(stream).await else {
                        return;
                    };
                    accepted.fetch_add(1, Ordering::SeqCst);
                    while let Some(Ok(msg)) = ws.next().await {
                        let Message::Binary(data) = msg else {
                            continue;
                        };
                        let mime_len = data[0] as usize;
                        let request: Value =
                            serde_json::from_slice(&data[1 + mime_len..]).expect("request body");
                        match handler(&request) {
                            Some(frames) => {
                                for frame in frames {
                                    if ws.send(Message::text(frame.to_string())).await.is_err() {
                                        return;
                                    }
                                }
                            }
                            None => {
                                let _ = ws.close(None).await;
                                return;
                            }
                        }
                    }
                });
            }
        });
    });
    (rx.recv().expect("server port"), sessions)
}

fn response(request: &Value, code: u16, data: Value) -> Value {
    json!({
        "requestId": request["requestId"],
        "status": {"code": code, "message": "", "attributes": {}},
        "result": {"data": data, "meta": {}}
    })
}

fn int64(n: i64) -> Value {
    json!({"@type": "g:Int64", "@value": n})
}

#[test]
fn test_group_count_round_trip() {
    let port = spawn_server(Arc::new(|request: &Value| {
        assert_eq!(request["op"], "eval");
        assert_eq!(request["args"]["aliases"]["g"], "g");
        assert_eq!(request["args"]["gremlin"], "g.V().groupCount().by(T.label)");
        let map = json!({"@type": "g:Map", "@value": ["person", int64(4), "software", int64(2)]});
        Some(vec![response(
            request,
            200,
            json!({"@type": "g:List", "@value": [map]}),
        )])
    }));

    let g = get_traversal("127.0.0.1", port).unwrap();
    let pending = g.v(Vec::<GraphValue>::new()).group_count().by(By::Label).next();
    let adapter = QueryResultAdapter::resolve_and_wrap(pending).unwrap();

    let (labels, values) = adapter.labeled_values().unwrap();
    assert_eq!(labels, vec!["person", "software"]);
    assert_eq!(values, vec![GraphValue::Int(4), GraphValue::Int(2)]);
}

#[test]
fn test_partial_frames_are_accumulated() {
    let port = spawn_server(Arc::new(|request: &Value| {
        let stray = json!({
            "requestId": "00000000-0000-0000-0000-000000000000",
            "status": {"code": 200, "message": ""},
            "result": {"data": {"@type": "g:List", "@value": ["stray"]}}
        });
        Some(vec![
            response(request, 206, json!({"@type": "g:List", "@value": ["marko", "vadas"]})),
            stray,
            response(request, 206, json!({"@type": "g:List", "@value": ["lop"]})),
            response(request, 200, json!({"@type": "g:List", "@value": ["josh"]})),
        ])
    }));

    let g = get_traversal("127.0.0.1", port).unwrap();
    let adapter =
        QueryResultAdapter::resolve_and_wrap(g.submit("g.V().values('name')")).unwrap();

    assert_eq!(
        adapter.serialize(),
        json!(["marko", "vadas", "lop", "josh"])
    );
    assert_eq!(adapter.to_table().unwrap().shape(), (4, 1));
}

#[test]
fn test_no_content_is_an_empty_list() {
    let port = spawn_server(Arc::new(|request: &Value| {
        Some(vec![response(request, 204, Value::Null)])
    }));

    let g = get_traversal("127.0.0.1", port).unwrap();
    let adapter = QueryResultAdapter::resolve_and_wrap(g.submit("g.V().drop()")).unwrap();
    assert_eq!(adapter.result(), &GraphValue::List(vec![]));
}

#[test]
fn test_bindings_are_sent() {
    let port = spawn_server(Arc::new(|request: &Value| {
        let bindings = request["args"]["bindings"].clone();
        Some(vec![response(
            request,
            200,
            json!({"@type": "g:List", "@value": [bindings]}),
        )])
    }));

    let g = get_traversal("127.0.0.1", port).unwrap();
    let pending = g.v(Vec::<GraphValue>::new()).has_label("person").limit(2).next();
    let adapter = QueryResultAdapter::resolve_and_wrap(pending).unwrap();

    assert_eq!(adapter.result().get("_0"), Some(&GraphValue::from("person")));
    assert_eq!(adapter.result().get("_1"), Some(&GraphValue::Int(2)));
}

#[test]
fn test_server_error_is_propagated() {
    let port = spawn_server(Arc::new(|request: &Value| {
        Some(vec![json!({
            "requestId": request["requestId"],
            "status": {"code": 597, "message": "No such property: nope"},
            "result": {"data": null}
        })])
    }));

    let g = get_traversal("127.0.0.1", port).unwrap();
    match QueryResultAdapter::resolve_and_wrap(g.submit("nope")) {
        Err(GremlabError::Server { code, message }) => {
            assert_eq!(code, 597);
            assert!(message.contains("nope"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_connection_is_reused_and_reopened_after_close() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let (port, sessions) = spawn_counting_server(Arc::new(move |request: &Value| {
        let n = seen.fetch_add(1, Ordering::SeqCst);
        if request["args"]["gremlin"] == "hang up" {
            return None;
        }
        Some(vec![response(
            request,
            200,
            json!({"@type": "g:List", "@value": [int64(n as i64)]}),
        )])
    }));

    let g = get_traversal("127.0.0.1", port).unwrap();
    let first = QueryResultAdapter::resolve_and_wrap(g.submit("one")).unwrap();
    assert_eq!(first.result(), &GraphValue::List(vec![GraphValue::Int(0)]));
    let second = QueryResultAdapter::resolve_and_wrap(g.submit("again")).unwrap();
    assert_eq!(second.result(), &GraphValue::List(vec![GraphValue::Int(1)]));
    assert_eq!(sessions.load(Ordering::SeqCst), 1);

    let dropped = QueryResultAdapter::resolve_and_wrap(g.submit("hang up"));
    assert!(matches!(dropped, Err(GremlabError::Connection(_))));
    assert_eq!(sessions.load(Ordering::SeqCst), 1);

    let after = QueryResultAdapter::resolve_and_wrap(g.submit("two")).unwrap();
    assert_eq!(after.result(), &GraphValue::List(vec![GraphValue::Int(3)]));
    assert_eq!(sessions.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unreachable_server_is_a_connection_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let g = get_traversal("127.0.0.1", port).unwrap();
    let outcome = QueryResultAdapter::resolve_and_wrap(g.submit("g.V()"));
    assert!(matches!(outcome, Err(GremlabError::Connection(_))));
}
