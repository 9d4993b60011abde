/// System prompt for the extraction call (non-negotiable constraints)
pub const SYSTEM_PROMPT: &str = r#"You are a senior bioinformatics analyst and medical literature researcher. You extract structured information from paper titles and abstracts. You MUST follow these rules:

1. Base every field ONLY on the title and abstract provided. Do not invent findings.
2. Submit your extraction with the submit_analysis tool; fill exactly the four fields it defines.
3. If a field is not addressed by the abstract, write "not reported" for that field.
4. Keep each field self-contained prose; no markdown, no bullet lists.

FIELDS:
- summary: the core mechanism or finding of the study, 2-4 sentences.
- sequencing_methods: every sequencing or assay technology used (e.g. 16S rRNA, shotgun metagenomics).
- tools: every bioinformatics tool, pipeline, programming language or package named (e.g. QIIME 2, DADA2, R).
- innovation: what is methodologically or mechanistically new in this study."#;

/// Build the user prompt for one article
pub fn build_article_prompt(title: &str, abstract_text: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("# Article\n\n");
    prompt.push_str(&format!("Title: {}\n\n", title));
    prompt.push_str(&format!("Abstract:\n{}\n\n", abstract_text));

    prompt.push_str("## Instructions\n");
    prompt.push_str("Read the title and abstract, then submit the four extraction fields ");
    prompt.push_str("using the submit_analysis tool.\n");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_title_and_abstract() {
        let prompt = build_article_prompt("A study of gut flora", "We sequenced things.");

        assert!(prompt.contains("Title: A study of gut flora"));
        assert!(prompt.contains("We sequenced things."));
        assert!(prompt.contains("submit_analysis"));
    }
}
