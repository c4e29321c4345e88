use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rulekit completions bash > ~/.bash_completion.d/rulekit\n\n\
                  Generate zsh completions:\n    rulekit completions zsh > ~/.zfunc/_rulekit\n\n\
                  Generate fish completions:\n    rulekit completions fish > ~/.config/fish/completions/rulekit.fish\n\n\
                  Generate PowerShell completions:\n    rulekit completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
