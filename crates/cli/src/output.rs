// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable rendering of one `Response` frame. No table/JSON mode
//! switch — the real UI this spec names is the browser client (external
//! per scope); this CLI's output only needs to be legible for an
//! operator at a terminal.

use af_core::Agent;
use af_daemon::protocol::Response;

pub fn print(response: &Response) {
    match response {
        Response::Agent { agent } => print_agent(agent),
        Response::Agents { agents } => {
            if agents.is_empty() {
                println!("no agents");
            }
            for agent in agents {
                print_agent_line(agent);
            }
        }
        Response::Ok => println!("ok"),
        Response::NotFound => println!("not found"),
        Response::Error { message } => eprintln!("error: {message}"),
    }
}

fn print_agent_line(agent: &Agent) {
    let attention = if agent.needs_attention { " !" } else { "" };
    println!(
        "{}  {:<12} {:<10} {}{}",
        agent.id, agent.project, agent.status, agent.task, attention
    );
}

fn print_agent(agent: &Agent) {
    println!("id:              {}", agent.id);
    println!("project:         {}", agent.project);
    println!("status:          {}", agent.status);
    println!("session:         {}", agent.session_name);
    println!("branch:          {}", agent.branch_name);
    println!("workspace:       {}", agent.workspace_path.display());
    println!("task:            {}", agent.task);
    println!("needs_attention: {}", agent.needs_attention);
    if let Some(response) = &agent.last_response {
        println!("last_response:   {response}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::test_support::test_agent;

    #[test]
    fn print_does_not_panic_on_an_agent_with_no_last_response() {
        let agent = test_agent("abc123", "demo");
        print(&Response::Agent { agent: agent.clone() });
        print(&Response::Agents { agents: vec![agent] });
        print(&Response::Ok);
        print(&Response::NotFound);
        print(&Response::Error { message: "boom".into() });
    }
}
