use engine::DialogWidget;

/// Pages dialog text into chunks of at most `page_chars` characters, breaking on words.
/// Shown pages are buffered as output lines for the driver to print.
#[derive(Debug)]
pub(crate) struct ConsoleDialog {
    page_chars: usize,
    pages: Vec<String>,
    page: usize,
    at_bottom: bool,
    output: Vec<String>,
}

impl ConsoleDialog {
    pub(crate) fn new(page_chars: usize) -> Self {
        Self {
            page_chars: page_chars.max(1),
            pages: Vec::new(),
            page: 0,
            at_bottom: false,
            output: Vec::new(),
        }
    }

    pub(crate) fn drain_output_into(&mut self, out: &mut Vec<String>) {
        out.append(&mut self.output);
    }

    fn show_current_page(&mut self) {
        let placement = if self.at_bottom { "bottom" } else { "top" };
        let text = self.pages.get(self.page).map(String::as_str).unwrap_or("");
        self.output.push(format!(
            "[dialog {placement} {}/{}] {text}",
            self.page + 1,
            self.pages.len().max(1)
        ));
    }
}

impl DialogWidget for ConsoleDialog {
    fn begin(&mut self, text: &str, display_at_bottom: bool) {
        self.pages = paginate(text, self.page_chars);
        self.page = 0;
        self.at_bottom = display_at_bottom;
        self.show_current_page();
    }

    fn end(&mut self) {
        self.pages.clear();
        self.page = 0;
        self.output.push("[dialog closed]".to_string());
    }

    fn is_complete(&self) -> bool {
        self.page + 1 >= self.pages.len()
    }

    fn finish_page(&mut self) {
        if !self.is_complete() {
            self.page += 1;
            self.show_current_page();
        }
    }
}

fn paginate(text: &str, page_chars: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > page_chars && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if word_len > page_chars {
            // A word longer than a page is split hard.
            let chars = word.chars().collect::<Vec<_>>();
            for chunk in chars.chunks(page_chars) {
                if !current.is_empty() {
                    pages.push(std::mem::take(&mut current));
                }
                current = chunk.iter().collect();
                current_len = chunk.len();
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}
