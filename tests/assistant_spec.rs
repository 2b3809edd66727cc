use speculate2::speculate;

speculate! {
    use std::sync::Arc;
    use std::time::Duration;

    use lexdesk::assistant::*;
    use tokio_test::block_on;

    fn canned(lines: &[&str]) -> Arc<dyn Responder> {
        let lines = lines.iter().map(|s| s.to_string()).collect();
        Arc::new(CannedResponder::new(Duration::ZERO).with_replies(DEFAULT_SECTION, lines))
    }

    describe "a new conversation" {
        it "opens with the greeting" {
            let assistant = Assistant::new(canned(&["ok"]), DEFAULT_SECTION);
            assert_eq!(assistant.messages().len(), 1);
            assert_eq!(assistant.messages()[0].text, GREETING);
            assert_eq!(assistant.state(), AssistantState::Idle);
        }
    }

    describe "sending" {
        it "records the trimmed message and the reply" {
            let mut assistant = Assistant::new(canned(&["On it."]), DEFAULT_SECTION);
            block_on(assistant.send("  draft a letter "));

            let log: Vec<_> = assistant
                .messages()
                .iter()
                .map(|m| (m.role, m.text.as_str()))
                .collect();
            assert_eq!(log[1..], [(Role::User, "draft a letter"), (Role::Assistant, "On it.")]);
            assert_eq!(assistant.state(), AssistantState::Idle);
        }

        it "ignores blank input" {
            let mut assistant = Assistant::new(canned(&["On it."]), DEFAULT_SECTION);
            assert!(block_on(assistant.send("\n")).is_none());
            assert_eq!(assistant.messages().len(), 1);
        }

        it "picks replies from the configured table" {
            let table = ["One.", "Two.", "Three."];
            let mut assistant = Assistant::new(canned(&table), "spaces");
            for _ in 0..10 {
                let reply = block_on(assistant.send("again")).unwrap();
                assert!(table.contains(&reply.text.as_str()));
            }
            assert_eq!(assistant.messages().len(), 21);
        }

        it "follows section changes" {
            let responder = CannedResponder::new(Duration::ZERO)
                .with_replies("cases", vec!["Case reply.".into()])
                .with_replies("calls", vec!["Call reply.".into()]);
            let mut assistant = Assistant::new(Arc::new(responder), "cases");

            assert_eq!(block_on(assistant.send("hi")).unwrap().text, "Case reply.");
            assistant.set_section("calls");
            assert_eq!(block_on(assistant.send("hi")).unwrap().text, "Call reply.");
        }

        it "falls back when the table is empty" {
            let mut assistant = Assistant::new(canned(&[]), DEFAULT_SECTION);
            assert_eq!(block_on(assistant.send("hi")).unwrap().text, FALLBACK_REPLY);
        }
    }
}
