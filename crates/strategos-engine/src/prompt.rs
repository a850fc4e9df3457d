//! Prompt construction for directive sections and chat turns.
//!
//! Everything here is pure: the same inputs always produce the same prompt.

use strategos_core::Section;

/// Marker opening the reasoning region of a backend response.
pub const REASONING_MARKER: &str = "----THOUGHTS----";
/// Marker opening the search-query region.
pub const QUERIES_MARKER: &str = "----SEARCH_QUERIES----";
/// Marker opening the deliverable region.
pub const DELIVERABLE_MARKER: &str = "----DELIVERABLE----";

const PERSONA: &str = "You are the AI Legal Strategos, the definitive oracle for modern Indian legal strategy. Your core function is to create the ultimate War Game Directive. Your analysis must be clinical, brutally honest, and relentlessly focused on achieving the Primary Strategic Objective. You will think not only as counsel but as the opposing counsel, the negotiator, and the judge.

Core Directives for the AI:
Adversarial Mindset: Model the opposition as a competent, aggressive adversary.
Quantify Everything: Where possible, attach numbers, probabilities, and financial ranges.
Prioritize Ruthlessly: Clearly distinguish between critical priorities and secondary concerns.
Clarity is Command: Use bolding, tables, and bullet points to create a directive that is instantly understandable.

Legal Framework: Your analysis will be built exclusively upon the modern Indian legal codes
The Bharatiya Nyaya Sanhita, 2023 (BNS)
The Bharatiya Nagarik Suraksha Sanhita, 2023 (BNSS)
The Bharatiya Sakshya Adhiniyam, 2023 (BSA)
The Constitution of India
The Consumer Protection Act, 2019
The Motor Vehicles Act, 1988 (and amendments)
The Sexual Harassment of Women at Workplace (Prevention, Prohibition and Redressal) Act, 2013.
The Protection of Children from Sexual Offences Act, 2012 (POCSO).
and all relevant civil statutes (Contract Act, Specific Relief Act, CPA, etc.).
Any reference to repealed laws (IPC, CrPC, IEA) is strictly forbidden.

Mandate: Upon receiving the case facts, generate the War Game Directive using the following definitive, eleven-part structure.
Generate report in this format:-
War Game Directive
Case File: [Insert Case Title]";

const REFLECT_STEP: &str = "2. Reflect and critique your answer. Be severe to maximize improvement.";
const QUERY_STEP: &str = "3. After the reflection, **list 1-3 search queries separately** for researching improvements. Do not include them inside the reflection.";

pub const CHAT_PERSONA: &str = "You are the AI Legal Strategos. You have already generated a comprehensive 'War Game Directive' for the user. Your current task is to answer follow-up questions concisely.

Core Directives:
- Your primary source of information is the conversation history and the original directive.
- Maintain your persona: clinical, brutally honest, and relentlessly focused on the user's strategic objectives.
- Keep responses concise: 3-4 lines maximum.";

/// Inputs shared by every section of one directive run, plus the section itself.
#[derive(Clone, Copy, Debug)]
pub struct SectionPrompt<'a> {
    pub case_facts: &'a str,
    pub section: Section,
    /// Assessment timestamp, identical across all sections of a run.
    pub timestamp: &'a str,
    pub instruction: &'a str,
}

/// The persona preamble with the section list, timestamp and instruction filled in.
pub fn system_preamble(timestamp: &str, instruction: &str) -> String {
    let mut out = String::with_capacity(PERSONA.len() + 1024);
    out.push_str(PERSONA);
    out.push_str("\nStrategic Assessment Date: ");
    out.push_str(timestamp);
    out.push_str("\n\n");
    for section in Section::ALL {
        out.push_str(&section.to_string());
        out.push('\n');
    }
    out.push('\n');
    out.push_str("1. ");
    out.push_str(instruction);
    out.push('\n');
    out.push_str(REFLECT_STEP);
    out.push('\n');
    out.push_str(QUERY_STEP);
    out.push('\n');
    out
}

/// Build the full backend prompt for one section. Case facts come last.
pub fn build_section_prompt(input: &SectionPrompt<'_>) -> String {
    let n = input.section.number();
    format!(
        "{system}\n\n\
         PART {n} \u{2014} Please produce only the THOUGHTS, SEARCH_QUERIES, and DELIVERABLE for this single numbered part.\n\
         \nUse the case facts below. Format your response exactly with these markers:\n\
         {REASONING_MARKER}\n\
         (Write step-by-step reasoning that justifies the deliverable for this part. Keep it concise, 2-6 sentences. This is internal reasoning; stream it first.)\n\
         {QUERIES_MARKER}\n\
         (List 0-3 short search queries (as a JSON array or newline-separated) that would help verify or strengthen the deliverable.)\n\
         {DELIVERABLE_MARKER}\n\
         (Produce the content for this part of the War Game Directive: final, clear, actionable, ~100-250 words depending on part complexity.)\n\n\
         \nCASE FACTS:\n{facts}\n\nNow produce the three sections for PART {n} only.",
        system = system_preamble(input.timestamp, input.instruction),
        facts = input.case_facts,
    )
}

/// Build the single prompt of a chat turn.
pub fn build_chat_prompt(query: &str, context: &str) -> String {
    format!("{CHAT_PERSONA}\n\n[RETRIEVED CONTEXT]\n{context}\n\n[USER QUERY]\n{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt_for(section: Section) -> String {
        build_section_prompt(&SectionPrompt {
            case_facts: "Tenant eviction dispute, Delhi, lease signed 2022",
            section,
            timestamp: "2025-03-01T10:00:00",
            instruction: "Analyse thoroughly.",
        })
    }

    #[test]
    fn section_prompt_names_part_twice() {
        let prompt = prompt_for(Section::SwotMatrix);
        assert!(prompt.contains("PART 5 \u{2014} Please produce only"));
        assert!(prompt.ends_with("Now produce the three sections for PART 5 only."));
    }

    #[test]
    fn section_prompt_lists_markers_in_order() {
        let prompt = prompt_for(Section::MissionBriefing);
        let r = prompt.find(REASONING_MARKER).unwrap();
        let q = prompt.find(QUERIES_MARKER).unwrap();
        let d = prompt.find(DELIVERABLE_MARKER).unwrap();
        assert!(r < q && q < d);
    }

    #[test]
    fn case_facts_come_last() {
        let prompt = prompt_for(Section::RedTeam);
        let facts = prompt.find("CASE FACTS:\nTenant eviction dispute").unwrap();
        assert!(facts > prompt.find(DELIVERABLE_MARKER).unwrap());
    }

    #[test]
    fn preamble_lists_all_sections() {
        let preamble = system_preamble("t", "i");
        for section in Section::ALL {
            assert!(preamble.contains(&section.to_string()), "missing {section}");
        }
        assert!(preamble.contains("Strategic Assessment Date: t"));
        assert!(preamble.contains("1. i\n2. Reflect"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(prompt_for(Section::Disclaimer), prompt_for(Section::Disclaimer));
        assert_ne!(prompt_for(Section::Disclaimer), prompt_for(Section::FinalCounsel));
    }

    #[test]
    fn chat_prompt_layout() {
        let prompt = build_chat_prompt("What next?", "facts\nPrevious AI Responses:\n");
        assert!(prompt.starts_with(CHAT_PERSONA));
        assert!(prompt.contains("\n\n[RETRIEVED CONTEXT]\nfacts\nPrevious AI Responses:\n"));
        assert!(prompt.ends_with("[USER QUERY]\nWhat next?"));
    }
}
