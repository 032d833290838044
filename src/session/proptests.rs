//! Property-based tests for the session
//!
//! Random interleavings of user commands and transport outcomes must keep the
//! transcript append-only and the single-flight discipline intact.

use super::*;
use crate::transport::{Answer, Attachment, ErrorDetail, RequestError, RequestErrorKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Submit(String),
    Attach(Vec<String>),
    Detach(usize),
    Succeed(String),
    Fail(String),
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-zA-Z0-9 ?]{1,30}",
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_text().prop_map(Op::Submit),
        2 => proptest::collection::vec("[a-z]{1,6}\\.(pdf|png|docx)", 0..3).prop_map(Op::Attach),
        1 => (0usize..5).prop_map(Op::Detach),
        2 => "[a-zA-Z ]{0,20}".prop_map(Op::Succeed),
        1 => "[a-zA-Z ]{0,20}".prop_map(Op::Fail),
    ]
}

fn apply(session: &mut Session, op: &Op) -> Option<Request> {
    match op {
        Op::Submit(text) => session.submit(text),
        Op::Attach(names) => {
            session.attach(names.iter().map(|n| Attachment::new(n.clone(), n.as_bytes().to_vec())));
            None
        }
        Op::Detach(index) => {
            session.detach(*index);
            None
        }
        Op::Succeed(answer) => {
            session.resolve(Ok(Answer::new(answer.clone())));
            None
        }
        Op::Fail(detail) => {
            session.resolve(Err(RequestError::new(
                RequestErrorKind::Server,
                ErrorDetail::Text(detail.clone()),
            )));
            None
        }
    }
}

proptest! {
    #[test]
    fn prop_transcript_is_append_only(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut session = Session::new("tok");
        let mut previous: Vec<Message> = Vec::new();

        for op in &ops {
            apply(&mut session, op);
            let current = session.transcript();
            prop_assert!(current.len() >= previous.len());
            prop_assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current.to_vec();
        }
    }

    #[test]
    fn prop_ids_strictly_increase(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut session = Session::new("tok").with_greeting("hi");
        for op in &ops {
            apply(&mut session, op);
        }
        let ids: Vec<u64> = session.transcript().iter().map(|m| m.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_request_issued_iff_session_becomes_busy(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut session = Session::new("tok");
        for op in &ops {
            let was_busy = session.is_busy();
            let request = apply(&mut session, op);
            if request.is_some() {
                prop_assert!(!was_busy);
                prop_assert!(session.is_busy());
            }
            if let Op::Submit(_) = op {
                if was_busy {
                    prop_assert!(request.is_none());
                }
            }
        }
    }

    #[test]
    fn prop_refused_submit_changes_nothing(
        setup in proptest::collection::vec(arb_op(), 0..20),
        text in arb_text(),
    ) {
        let mut session = Session::new("tok");
        for op in &setup {
            apply(&mut session, op);
        }

        let before = session.snapshot();
        if session.submit(&text).is_none() {
            let after = session.snapshot();
            prop_assert_eq!(before.messages, after.messages);
            prop_assert_eq!(before.pending, after.pending);
            prop_assert_eq!(before.busy, after.busy);
        }
    }

    #[test]
    fn prop_accepted_submit_drains_all_pending(
        names in proptest::collection::vec("[a-z]{1,6}\\.pdf", 1..5),
        text in arb_text(),
    ) {
        let mut session = Session::new("tok");
        session.attach(names.iter().map(|n| Attachment::new(n.clone(), vec![0u8])));

        let request = session.submit(&text);
        prop_assert!(session.pending().is_empty());
        match request {
            Some(Request::Attachments { files, .. }) => {
                let sent: Vec<String> = files.into_iter().map(|f| f.name).collect();
                prop_assert_eq!(sent, names);
            }
            other => prop_assert!(false, "expected attachment request, got {:?}", other),
        }
    }
}
