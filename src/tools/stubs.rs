//! Capabilities whose behaviour lives outside this crate. Each one answers
//! with a fixed payload and echoes the arguments it received.

use anyhow::Result;
use serde_json::{json, Value};

use super::{ArgumentBag, Capability};

pub struct CannedCapability {
    name: &'static str,
    description: &'static str,
    response: Value,
}

impl CannedCapability {
    pub fn new(name: &'static str, description: &'static str, response: Value) -> Self {
        Self {
            name,
            description,
            response,
        }
    }
}

impl Capability for CannedCapability {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn execute(&self, args: &ArgumentBag) -> Result<Value> {
        log::debug!("{} called with {}", self.name, args.to_value());

        let mut output = json!({ "status": "success" });
        if let (Some(out), Some(extra)) = (output.as_object_mut(), self.response.as_object()) {
            out.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        output["arguments"] = args.to_value();
        Ok(output)
    }
}

/// The fixed set of canned capabilities known to the registry.
pub fn canned_capabilities() -> Vec<CannedCapability> {
    vec![
        CannedCapability::new(
            "delete_file",
            "Delete a file from the workspace",
            json!({ "message": "File deleted." }),
        ),
        CannedCapability::new(
            "execute_code",
            "Run a snippet of code and return its output",
            json!({ "output": "Code execution output." }),
        ),
        CannedCapability::new(
            "search",
            "Search the workspace",
            json!({ "results": "Search results here." }),
        ),
        CannedCapability::new(
            "open_in_vscode",
            "Open a file in the editor",
            json!({ "message": "Opened in VS Code." }),
        ),
        CannedCapability::new(
            "web_search",
            "Search the web",
            json!({ "results": [{ "title": "Result 1", "url": "http://example.com" }] }),
        ),
        CannedCapability::new(
            "deep_research",
            "Research a topic in depth",
            json!({ "summary": "Deep research summary." }),
        ),
        CannedCapability::new(
            "think_deeper",
            "Produce a deeper analysis of a topic",
            json!({ "analysis": "Deeper analysis of the topic." }),
        ),
        CannedCapability::new(
            "write_python",
            "Generate Python code",
            json!({ "code": "print('Hello, World!')" }),
        ),
        CannedCapability::new(
            "write_typescript",
            "Generate TypeScript code",
            json!({ "code": "console.log('Hello, World!');" }),
        ),
        CannedCapability::new(
            "refactor_code",
            "Refactor a piece of code",
            json!({ "refactored_code": "..." }),
        ),
        CannedCapability::new(
            "read_code",
            "Explain what a piece of code does",
            json!({ "explanation": "This code does..." }),
        ),
        CannedCapability::new(
            "create_learning_plan",
            "Draft a learning plan for a topic",
            json!({ "plan": "1. Learn basics. 2. Practice. 3. Advanced topics." }),
        ),
        CannedCapability::new(
            "find_analogy",
            "Find an analogy for a concept",
            json!({ "analogy": "A tool registry is like a phone book for functions." }),
        ),
        CannedCapability::new(
            "generate_quiz",
            "Generate quiz questions for a topic",
            json!({ "quiz": [{ "question": "What is Rust?", "answer": "A programming language." }] }),
        ),
        CannedCapability::new(
            "evaluate_answer",
            "Give feedback on an answer",
            json!({ "feedback": "Your answer is correct and well-explained." }),
        ),
    ]
}
