use super::*;
use af_core::test_support::test_agent;

fn sample(agent_id: &str) -> UpdateMessage {
    UpdateMessage::AgentUpdate { agent: test_agent(agent_id, "demo") }
}

#[tokio::test]
async fn a_published_message_reaches_every_subscriber() {
    let hub = BroadcastHub::new(8, Duration::from_secs(30));
    let sub_a = hub.subscribe();
    let sub_b = hub.subscribe();

    hub.publish(sample("a1b2c3"));

    let got_a = sub_a.recv().await;
    let got_b = sub_b.recv().await;
    assert!(matches!(got_a, UpdateMessage::AgentUpdate { .. }));
    assert!(matches!(got_b, UpdateMessage::AgentUpdate { .. }));
}

#[tokio::test]
async fn a_full_mailbox_drops_the_oldest_message() {
    let hub = BroadcastHub::new(2, Duration::from_secs(30));
    let sub = hub.subscribe();

    hub.publish(sample("111111"));
    hub.publish(sample("222222"));
    hub.publish(sample("333333"));

    let first = sub.recv().await;
    let second = sub.recv().await;
    assert!(matches!(first, UpdateMessage::AgentUpdate { agent } if agent.id.as_str() == "222222"));
    assert!(matches!(second, UpdateMessage::AgentUpdate { agent } if agent.id.as_str() == "333333"));
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn dropping_a_subscription_removes_it_from_the_hub() {
    let hub = BroadcastHub::new(8, Duration::from_secs(30));
    let sub = hub.subscribe();
    assert_eq!(hub.subscriber_count(), 1);
    drop(sub);
    assert_eq!(hub.subscriber_count(), 0);
}

#[tokio::test]
async fn dropping_one_subscriber_does_not_affect_another() {
    let hub = BroadcastHub::new(8, Duration::from_secs(30));
    let sub_a = hub.subscribe();
    let sub_b = hub.subscribe();
    drop(sub_a);

    hub.publish(sample("abcdef"));
    let got = sub_b.recv().await;
    assert!(matches!(got, UpdateMessage::AgentUpdate { .. }));
}
