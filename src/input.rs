//! Turning free text into an ordered prompt list

/// Prompts separated by blank lines
pub fn prompts_from_text(text: &str) -> Vec<String>
{   text.replace("\r\n", "\n")
      .split("\n\n")
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .map(str::to_string)
      .collect()
}

/// One prompt per non-empty line
pub fn prompts_from_lines(text: &str) -> Vec<String>
{   text.lines()
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .map(str::to_string)
      .collect()
}
