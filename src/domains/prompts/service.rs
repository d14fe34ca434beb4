//! Prompt service implementation.
//!
//! The PromptService keeps the registered templates and renders them on
//! request. Prompts are defined in `definitions/` and registered via
//! `registry.rs`.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Service for listing and instantiating prompts.
pub struct PromptService {
    /// Key: prompt name.
    prompts: HashMap<String, PromptTemplate>,
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptService {
    pub fn new() -> Self {
        info!("Initializing PromptService");

        let mut service = Self {
            prompts: HashMap::new(),
        };
        for template in get_all_prompts() {
            service.register_prompt(template);
        }
        service
    }

    /// Register a prompt template.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        info!("Registering prompt: {}", template.name);
        self.prompts.insert(template.name.clone(), template);
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .values()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: template.title.clone(),
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Get a prompt with arguments substituted.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();

        if let Some(missing) = template
            .arguments
            .iter()
            .find(|arg| arg.required.unwrap_or(false) && !arguments.contains_key(&arg.name))
        {
            return Err(PromptError::missing_argument(&missing.name));
        }

        debug!(prompt = name, "Rendering prompt");
        let content = template.render(&arguments)?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_text(result: &GetPromptResult) -> String {
        let message = serde_json::to_value(&result.messages[0]).unwrap();
        message["content"]["text"].as_str().unwrap().to_string()
    }

    fn directory_args(directory: &str) -> HashMap<String, String> {
        HashMap::from([("directory".to_string(), directory.to_string())])
    }

    #[tokio::test]
    async fn test_lists_organize_files() {
        let service = PromptService::new();
        let prompts = service.list_prompts().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "organize_files");
    }

    #[tokio::test]
    async fn test_organize_files_renders_directory() {
        let service = PromptService::new();

        let result = service
            .get_prompt("organize_files", Some(directory_args("/home/me/Downloads")))
            .await
            .unwrap();

        assert_eq!(result.messages.len(), 1);
        let text = message_text(&result);
        assert!(text.starts_with(
            "Please help me organize the files in \"/home/me/Downloads\". For this task:"
        ));
        assert!(text.contains("4. Help me implement the organization plan\n\nYou can use"));
        assert!(!text.contains("My goal"));
    }

    #[tokio::test]
    async fn test_organize_files_includes_goal() {
        let service = PromptService::new();
        let mut args = directory_args("/data");
        args.insert("goal".to_string(), "group by year".to_string());

        let result = service
            .get_prompt("organize_files", Some(args))
            .await
            .unwrap();
        assert!(message_text(&result).contains("My goal for this organization: group by year"));
    }

    #[tokio::test]
    async fn test_organize_files_does_not_touch_filesystem() {
        let service = PromptService::new();

        let result = service
            .get_prompt("organize_files", Some(directory_args("/does/not/exist")))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let service = PromptService::new();

        let err = service.get_prompt("organize_files", None).await.unwrap_err();
        assert!(matches!(err, PromptError::MissingArgument(ref a) if a == "directory"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let service = PromptService::new();

        let err = service.get_prompt("nonexistent", None).await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }
}
