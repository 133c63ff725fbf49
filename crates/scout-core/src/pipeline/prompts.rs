//! Agent descriptions and instructions

/// Static description of one pipeline agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
}

pub const PLANNER: AgentSpec = AgentSpec {
    name: "planner",
    description: "Breaks a research topic into a short list of questions and sources to check",
    instruction: "You are a research planner. Given a topic, write a concise research plan: \
the key questions to answer, the kinds of sources worth consulting, and the search queries \
to start with. Answer with a numbered list of at most seven steps. Do not answer the \
questions yourself.",
};

pub const RESEARCHER: AgentSpec = AgentSpec {
    name: "researcher",
    description: "Agent to help search the web and retrieve information",
    instruction: "I can help you search the web for information. You can ask me to search for \
topics, retrieve data from websites, and find answers to your questions. Follow the research \
plan, use the available web tools to search and scrape pages, and collect facts together with \
the URLs they came from. When you have enough material, reply without calling any tool and \
give your findings as bullet points, each with its source URL.",
};

pub const PUBLISHER: AgentSpec = AgentSpec {
    name: "publisher",
    description: "Turns research findings into a readable report",
    instruction: "You are a technical writer. Turn the research findings into a well structured \
Markdown report with a title, a short summary, sections for the main themes, and a list of \
sources at the end. Use only facts present in the findings and keep every source URL.",
};

/// First user turn for the planner
pub fn planner_input(topic: &str) -> String {
    format!("Research topic: {}", topic)
}

/// First user turn for the researcher
pub fn researcher_input(topic: &str, plan: &str) -> String {
    format!("Research topic: {}\n\nResearch plan:\n{}", topic, plan)
}

/// Sent when the researcher used up its tool budget
pub const WRAP_UP_PROMPT: &str =
    "The tool budget for this research is used up. Summarize your findings now, without calling tools.";

/// First user turn for the publisher
pub fn publisher_input(topic: &str, findings: &str) -> String {
    format!("Research topic: {}\n\nFindings:\n{}", topic, findings)
}
