//! The composed "answer this question" chain.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use ankita_llm::provider::LlmProvider;
use ankita_memory::Document;

use crate::error::QueryError;
use crate::prompt::PromptTemplate;
use crate::retriever::Retriever;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Separator placed between retrieved passages in the rendered context.
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Raw chain output: the generated text and the passages it was grounded on.
#[derive(Debug, Clone)]
pub struct QaOutput {
    pub answer: String,
    /// Retrieval order, most similar first.
    pub source_documents: Vec<Document>,
}

/// A ready-to-use question answering pipeline shared by all requests.
pub trait AnswerChain: Send + Sync {
    fn invoke<'a>(&'a self, question: &'a str) -> BoxFuture<'a, Result<QaOutput, QueryError>>;

    /// Number of passages in the underlying index.
    fn document_count(&self) -> usize;
}

/// Retrieve, stuff every passage into one prompt, generate.
pub struct RetrievalQa<E, G> {
    retriever: Retriever<E>,
    template: PromptTemplate,
    generator: Arc<G>,
}

impl<E: LlmProvider, G: LlmProvider> RetrievalQa<E, G> {
    #[must_use]
    pub fn new(retriever: Retriever<E>, template: PromptTemplate, generator: Arc<G>) -> Self {
        Self {
            retriever,
            template,
            generator,
        }
    }

    async fn run(&self, question: &str) -> Result<QaOutput, QueryError> {
        let documents = self.retriever.retrieve(question).await?;
        let context = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR);
        let prompt = self.template.render(&context, question);

        let answer = self
            .generator
            .chat(&prompt)
            .await
            .map_err(QueryError::Generation)?;

        tracing::info!(
            k = self.retriever.k(),
            passages = documents.len(),
            answer_len = answer.len(),
            "question answered"
        );
        Ok(QaOutput {
            answer,
            source_documents: documents,
        })
    }
}

impl<E: LlmProvider, G: LlmProvider> AnswerChain for RetrievalQa<E, G> {
    fn invoke<'a>(&'a self, question: &'a str) -> BoxFuture<'a, Result<QaOutput, QueryError>> {
        Box::pin(self.run(question))
    }

    fn document_count(&self) -> usize {
        self.retriever.store().len()
    }
}
