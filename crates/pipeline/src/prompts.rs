//! Prompt templates for the pipeline — pure string builders, no logic.

/// Shared research-planner preamble embedding the user's question.
fn preamble(user_input: &str) -> String {
    format!(
        "You are a research planner AI agent.\n\
         \n\
         Your task is to assist users in formulating effective research queries based on their input using online resources.\n\
         Your answer MUST be technical and detailed, using up to date information.\n\
         Cite facts, data, specific examples, and statistics from your search results to support your conclusions.\n\
         If you are unsure about something, make sure to mention it.\n\
         Don't forget to cite your sources using [title](url) format.\n\
         \n\
         here's the user input:\n\
         <user_input>\n\
         {user_input}\n\
         </user_input>\n"
    )
}

/// Planning prompt: break the question into 3-10 targeted sub-queries.
pub fn build_queries(user_input: &str) -> String {
    format!(
        "{}\n\
         Your first objective is to break down the user's input into a series of specific, targeted research queries that will help gather relevant information.\n\
         Generate a list of 4 concise and specific research queries that cover different aspects of the user's input.\n\
         Answer with anything between 3-10 queries.",
        preamble(user_input)
    )
}

/// Summarization prompt: distill one sub-query's search results.
pub fn summarize_results(user_input: &str, search_results: &str) -> String {
    format!(
        "{}\n\
         Your objective is analyze the search results and extract relevant information to build a comprehensive report.\n\
         Generate a detailed summary of the search results, including key findings, insights, and any relevant data or statistics.\n\
         Your summary should be structured and easy to read, with clear headings and bullet points where appropriate.\n\
         Make sure to include citations for any sources referenced in your summary.\n\
         \n\
         Here's the web search results:\n\
         <search_results>\n\
         {search_results}\n\
         </search_results>",
        preamble(user_input)
    )
}

/// Synthesis prompt: produce the cited final response from all findings.
pub fn final_response(user_input: &str, search_results: &str) -> String {
    format!(
        "{}\n\
         Your objective here is develop a final response to the user using\n\
         the reports made during the web search, with their synthesis.\n\
         \n\
         The response should contain something between 500 - 800 words.\n\
         \n\
         Here's the web search results:\n\
         <SEARCH_RESULTS>\n\
         {search_results}\n\
         </SEARCH_RESULTS>\n\
         \n\
         You must add reference citations (with the number of the citation, example: [1]) for the\n\
         articles you used in each paragraph of your answer.",
        preamble(user_input)
    )
}
