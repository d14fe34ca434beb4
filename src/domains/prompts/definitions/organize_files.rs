//! Organize files prompt definition.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

/// Walks the model through sorting the contents of a directory.
///
/// Rendering never touches the filesystem; the model is expected to call
/// `list_files` and `write_file` itself.
pub struct OrganizeFilesPrompt;

impl PromptDefinition for OrganizeFilesPrompt {
    const NAME: &'static str = "organize_files";
    const DESCRIPTION: &'static str = "Plan and carry out the organization of files in a directory";

    fn template() -> &'static str {
        r#"Please help me organize the files in "{{directory}}". For this task:

1. List all files in the directory
2. Suggest a logical grouping or categorization for the files
3. Create a plan for where each file should go
4. Help me implement the organization plan
{{#if goal}}
My goal for this organization: {{goal}}
{{/if}}
You can use the list_files tool to see what's in the directory, and write_file to create any new files needed."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            PromptArgument {
                name: "directory".to_string(),
                title: Some("Directory".to_string()),
                description: Some("Directory containing the files to organize".to_string()),
                required: Some(true),
            },
            PromptArgument {
                name: "goal".to_string(),
                title: None,
                description: Some(
                    "What the organization should achieve, e.g. 'group by year'".to_string(),
                ),
                required: Some(false),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organize_files_metadata() {
        assert_eq!(OrganizeFilesPrompt::NAME, "organize_files");

        let args = OrganizeFilesPrompt::arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].name, "directory");
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].required, Some(false));
    }

    #[test]
    fn test_template_mentions_tools() {
        let template = OrganizeFilesPrompt::template();
        assert!(template.contains("list_files"));
        assert!(template.contains("write_file"));
        assert!(template.contains("\"{{directory}}\""));
    }
}
