//! Heading scan over semi-structured Markdown.
//!
//! Rules:
//! - A heading line starts with 1 to 6 `#` characters, followed by optional
//!   whitespace and a non-empty title. Seven or more `#` is not a heading.
//! - A section's body runs from the line after its heading up to the next
//!   heading of any level, or the end of the document.
//! - Lines inside fenced code blocks (```` ``` ````) are never headings.
//! - Title matching is a case-insensitive prefix match on the heading text.

/// One heading plus the text it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub level: usize,
    pub title: &'a str,
    pub body: &'a str,
}

/// Parse a single line as a heading, returning `(level, title)`
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let title = line[level..].trim();
    if title.is_empty() {
        None
    } else {
        Some((level, title))
    }
}

/// Split a document into its headed sections, in document order.
/// Text before the first heading belongs to no section.
pub fn split_sections(doc: &str) -> Vec<Section<'_>> {
    // (level, title, body_start, heading_start)
    let mut headings: Vec<(usize, &str, usize, usize)> = Vec::new();
    let mut offset = 0;
    let mut in_fence = false;

    for line in doc.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, title)) = parse_heading(line) {
            headings.push((level, title, offset, line_start));
        }
    }

    headings
        .iter()
        .enumerate()
        .map(|(i, &(level, title, body_start, _))| {
            let body_end = headings
                .get(i + 1)
                .map(|&(_, _, _, next_heading)| next_heading)
                .unwrap_or(doc.len());
            Section {
                level,
                title,
                body: doc[body_start..body_end].trim(),
            }
        })
        .collect()
}

fn title_matches(title: &str, wanted: &str) -> bool {
    title.to_lowercase().starts_with(&wanted.to_lowercase())
}

/// First section whose title starts with `wanted` and whose body is not empty.
/// An empty heading (e.g. a title followed directly by another title) is skipped.
pub fn find_section<'a>(doc: &'a str, wanted: &str) -> Option<Section<'a>> {
    split_sections(doc)
        .into_iter()
        .find(|section| title_matches(section.title, wanted) && !section.body.is_empty())
}

/// Every section whose title contains `marker`, case-insensitively
pub fn sections_containing<'a>(doc: &'a str, marker: &str) -> Vec<Section<'a>> {
    let marker = marker.to_lowercase();
    split_sections(doc)
        .into_iter()
        .filter(|section| section.title.to_lowercase().contains(&marker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "\
Intro sem título

# Links Rápidos
- [Aula 1](https://example.com/1)

## Plano de Contas
1. Receitas
2. Despesas
### Transcrição - Aula 1
[00:10] Bem-vindos
####### não é título
```
# comentário dentro de código
```
## Outros
fim
";

    #[test]
    fn test_parse_heading_levels() {
        assert_eq!(parse_heading("# Título"), Some((1, "Título")));
        assert_eq!(parse_heading("###Sem espaço"), Some((3, "Sem espaço")));
        assert_eq!(parse_heading("###### Seis\r\n"), Some((6, "Seis")));
        assert_eq!(parse_heading("####### Sete"), None);
        assert_eq!(parse_heading("##   "), None);
        assert_eq!(parse_heading("texto # não"), None);
    }

    #[test]
    fn test_split_sections_bodies() {
        let sections = split_sections(DOC);
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Links Rápidos", "Plano de Contas", "Transcrição - Aula 1", "Outros"]
        );
        assert_eq!(sections[1].body, "1. Receitas\n2. Despesas");
        assert_eq!(sections[3].body, "fim");
    }

    #[test]
    fn test_fenced_code_is_not_a_heading() {
        let transcript = find_section(DOC, "transcrição").unwrap();
        assert!(transcript.body.contains("# comentário dentro de código"));
        assert!(transcript.body.contains("####### não é título"));
    }

    #[test]
    fn test_find_section_case_insensitive_prefix() {
        let links = find_section(DOC, "links rápidos").unwrap();
        assert_eq!(links.level, 1);
        assert_eq!(links.body, "- [Aula 1](https://example.com/1)");
        assert!(find_section(DOC, "rápidos").is_none());
    }

    #[test]
    fn test_find_section_skips_empty_heading() {
        let doc = "# Plano de contas\n\n# Plano de Contas\n3.1 Receita bruta\n# Outros\nx";
        let chart = find_section(doc, "plano de contas").unwrap();
        assert_eq!(chart.title, "Plano de Contas");
        assert_eq!(chart.body, "3.1 Receita bruta");
        assert!(find_section("# Plano de contas\n", "plano de contas").is_none());
    }

    #[test]
    fn test_sections_containing_marker() {
        let doc = "# Transcrições\na\n## Aula 2 (transcript)\nb\n## Outro\nc";
        let found = sections_containing(doc, "transcri");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].body, "a");
        assert_eq!(found[1].body, "b");
    }
}
