pub fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        r#"You are a helpful assistant.

Here is some context:

{context}

Now answer the following question:

{question}

Answer:"#
    )
}
