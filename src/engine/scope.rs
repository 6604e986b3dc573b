//! Scope tracking for Mu documents
//!
//! Builds a tree of lexical scopes and the symbols declared in each from the token stream alone. There is no
//! grammar: declaration keywords, binding keywords, type names, parentheses and braces drive a small state machine.
//!
//! ## Representation
//!
//! - [`Scope`] is the position-independent payload. Symbol and child offsets are relative to the scope start, and
//!   children are reference counted, so a subtree that did not change is shared between document versions.
//! - [`ScopeTree`] is the per-version arena. It resolves absolute spans, addresses scopes by [`ScopeId`] and stores
//!   each parent as an id.
//!
//! ## Incremental updates
//!
//! [`ScopeTracker::update`] reattaches every closed subtree of the previous version that lies entirely outside the
//! relexed token range, as soon as the builder reaches its first token with nothing pending. Scopes closed
//! synthetically at end of document are never reattached.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use mu_core::lang::keywords;
use mu_core::lang::registry::DeclarationKind;
use mu_syntax::lexer::{Span, Token, TokenKind, comment_body};

// ============================================================================
// Scope data
// ============================================================================

/// Kind of a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The whole document
    Module,
    Namespace,
    Class,
    Function,
    /// A `{ ... }` not owned by a declaration
    Block,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeKind::Module => "module",
            ScopeKind::Namespace => "namespace",
            ScopeKind::Class => "class",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
        })
    }
}

/// What a symbol (or completion candidate) names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Keyword,
    Type,
    Variable,
    Function,
    Namespace,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Keyword => "keyword",
            SymbolKind::Type => "type",
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Namespace => "namespace",
        })
    }
}

/// A declared name. `offset` is relative to the start of the owning scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub declared_kind: SymbolKind,
    pub offset: usize,
    pub len: usize,
    pub documentation: Option<String>,
}

/// Name a declaration scope introduces into its parent, relative to the scope start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declared {
    pub name: String,
    pub kind: SymbolKind,
    pub name_offset: usize,
    pub name_len: usize,
}

/// Child scope at `offset` bytes from its parent's start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildScope {
    pub offset: usize,
    pub scope: Arc<Scope>,
}

/// Position-independent scope payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: Option<String>,
    pub len: usize,
    /// `false` when the scope ran to end of document without a closing `}`
    pub closed: bool,
    pub symbols: Vec<Symbol>,
    pub children: Vec<ChildScope>,
    pub declared: Option<Declared>,
}

// ============================================================================
// Per-version arena
// ============================================================================

/// Index of a scope in a [`ScopeTree`]. Only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A scope resolved to absolute positions.
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    parent: Option<ScopeId>,
    span: Span,
    depth: usize,
    node: Arc<Scope>,
    children: Vec<ScopeId>,
}

impl ScopeEntry {
    pub fn kind(&self) -> ScopeKind {
        self.node.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.node.name.as_deref()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn is_closed(&self) -> bool {
        self.node.closed
    }

    /// The shared payload; equal pointers across versions mean the subtree was reused.
    pub fn node(&self) -> &Arc<Scope> {
        &self.node
    }

    /// Symbols with their absolute name spans, in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = (&Symbol, Span)> + '_ {
        let start = self.span.start;
        self.node
            .symbols
            .iter()
            .map(move |s| (s, Span::new(start + s.offset, start + s.offset + s.len)))
    }

    /// A closed scope owns the offsets strictly between its first and last byte; one closed at end of document
    /// also owns the end of the document.
    fn contains(&self, offset: usize) -> bool {
        if self.node.closed {
            self.span.start < offset && offset < self.span.end
        } else {
            self.span.start < offset && offset <= self.span.end
        }
    }
}

/// A symbol visible from some offset.
#[derive(Debug, Clone, Copy)]
pub struct VisibleSymbol<'t> {
    pub symbol: &'t Symbol,
    pub origin_scope: ScopeId,
    /// Absolute span of the declared name
    pub span: Span,
    /// 0 for the innermost scope, counting outward
    pub distance: usize,
}

/// Scope tree of one document version.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    entries: Vec<ScopeEntry>,
}

impl PartialEq for ScopeTree {
    fn eq(&self, other: &Self) -> bool {
        self.entries[0].node == other.entries[0].node
    }
}

impl Eq for ScopeTree {}

impl ScopeTree {
    fn from_root(root: Arc<Scope>) -> Self {
        let mut entries = vec![ScopeEntry {
            parent: None,
            span: Span::new(0, root.len),
            depth: 0,
            node: root,
            children: Vec::new(),
        }];
        let mut stack = vec![ScopeId::ROOT];
        while let Some(id) = stack.pop() {
            let (start, depth, node) = {
                let entry = &entries[id.index()];
                (entry.span.start, entry.depth, Arc::clone(&entry.node))
            };
            for child in &node.children {
                let child_id = ScopeId(entries.len() as u32);
                let child_start = start + child.offset;
                entries.push(ScopeEntry {
                    parent: Some(id),
                    span: Span::new(child_start, child_start + child.scope.len),
                    depth: depth + 1,
                    node: Arc::clone(&child.scope),
                    children: Vec::new(),
                });
                entries[id.index()].children.push(child_id);
                stack.push(child_id);
            }
        }
        Self { entries }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, id: ScopeId) -> Option<&ScopeEntry> {
        self.entries.get(id.index())
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).and_then(ScopeEntry::parent)
    }

    fn entry(&self, id: ScopeId) -> &ScopeEntry {
        &self.entries[id.index()]
    }

    /// Innermost scope containing `offset`; the module scope when no other does.
    pub fn innermost_at(&self, offset: usize) -> ScopeId {
        let mut current = ScopeId::ROOT;
        'descend: loop {
            for &child in &self.entry(current).children {
                if self.entry(child).contains(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Scopes containing `offset`, innermost first, ending with the module scope.
    pub fn chain_at(&self, offset: usize) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = Some(self.innermost_at(offset));
        while let Some(id) = current {
            chain.push(id);
            current = self.entry(id).parent;
        }
        chain
    }

    /// Every symbol declared in a scope containing `offset`, innermost scope first.
    ///
    /// Shadowed names are not removed; callers decide how to treat duplicates.
    pub fn visible_symbols(&self, offset: usize) -> Vec<VisibleSymbol<'_>> {
        self.chain_at(offset)
            .into_iter()
            .enumerate()
            .flat_map(|(distance, id)| {
                self.entry(id).symbols().map(move |(symbol, span)| VisibleSymbol {
                    symbol,
                    origin_scope: id,
                    span,
                    distance,
                })
            })
            .collect()
    }

    /// Indented outline of scopes and symbols.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(ScopeId::ROOT, &mut out);
        out
    }

    fn render_into(&self, id: ScopeId, out: &mut String) {
        let entry = self.entry(id);
        let indent = "  ".repeat(entry.depth);
        let _ = write!(out, "{indent}{}", entry.kind());
        if let Some(name) = entry.name() {
            let _ = write!(out, " {name}");
        }
        let _ = write!(out, " {}..{}", entry.span.start, entry.span.end);
        if !entry.is_closed() {
            out.push_str(" (unclosed)");
        }
        out.push('\n');
        for (symbol, span) in entry.symbols() {
            let _ = write!(out, "{indent}  - {} {} @{}", symbol.declared_kind, symbol.name, span.start);
            if symbol.documentation.is_some() {
                out.push_str(" (documented)");
            }
            out.push('\n');
        }
        for &child in &entry.children {
            self.render_into(child, out);
        }
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Builds [`ScopeTree`]s from token streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeTracker;

impl ScopeTracker {
    /// Build the tree for a full token stream.
    #[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
    pub fn build(tokens: &[Token]) -> ScopeTree {
        let (root, _) = Builder::new(tokens, HashMap::new()).run();
        ScopeTree::from_root(root)
    }

    /// Build the tree for `tokens`, reusing subtrees of `old` outside `changed`.
    ///
    /// `changed` is the relexed byte range in pre-edit coordinates; `delta` is the edit's length difference.
    #[tracing::instrument(skip_all, fields(tokens = tokens.len(), changed_start = changed.start, changed_end = changed.end))]
    pub fn update(old: &ScopeTree, tokens: &[Token], changed: Span, delta: isize) -> ScopeTree {
        let reusable = collect_reusable(old, changed, delta);
        let candidates = reusable.len();
        let (root, reused) = Builder::new(tokens, reusable).run();
        tracing::debug!(candidates, reused, "scope tree updated");
        ScopeTree::from_root(root)
    }
}

/// Closed subtrees of `old` that lie entirely outside `changed`, keyed by their start in new coordinates.
fn collect_reusable(old: &ScopeTree, changed: Span, delta: isize) -> HashMap<usize, Arc<Scope>> {
    let mut reusable = HashMap::new();
    let mut stack = old.entry(ScopeId::ROOT).children.clone();
    while let Some(id) = stack.pop() {
        let entry = old.entry(id);
        let span = entry.span;
        if entry.is_closed() && span.end <= changed.start {
            reusable.insert(span.start, Arc::clone(&entry.node));
        } else if entry.is_closed() && span.start >= changed.end {
            reusable.insert(span.start.saturating_add_signed(delta), Arc::clone(&entry.node));
        } else {
            stack.extend_from_slice(&entry.children);
        }
    }
    reusable
}

// ============================================================================
// Builder state machine
// ============================================================================

#[derive(Debug)]
struct Frame {
    kind: ScopeKind,
    name: Option<String>,
    start: usize,
    symbols: Vec<Symbol>,
    children: Vec<ChildScope>,
    declared: Option<Declared>,
}

impl Frame {
    fn new(kind: ScopeKind, name: Option<String>, start: usize) -> Self {
        Self {
            kind,
            name,
            start,
            symbols: Vec::new(),
            children: Vec::new(),
            declared: None,
        }
    }

    fn finish(self, end: usize, closed: bool) -> Scope {
        Scope {
            kind: self.kind,
            name: self.name,
            len: end - self.start,
            closed,
            symbols: self.symbols,
            children: self.children,
            declared: self.declared,
        }
    }
}

#[derive(Debug, Default)]
enum Pending {
    #[default]
    None,
    /// After `let`/`var`/`global`/`const`, `require`/`use`, or a type name
    Binding(PendingBinding),
    /// After a declaration keyword that may own a scope
    Decl(PendingDecl),
}

#[derive(Debug)]
struct PendingBinding {
    kind: SymbolKind,
    doc: Option<String>,
    /// Introduced by a type name, so array suffixes like `[3]` may follow
    typed: bool,
}

#[derive(Debug)]
struct PendingDecl {
    start: usize,
    scope_kind: ScopeKind,
    symbol_kind: SymbolKind,
    doc: Option<String>,
    name: Option<(String, Span)>,
    stage: DeclStage,
    params: Vec<(String, Span)>,
}

#[derive(Debug)]
enum DeclStage {
    /// Right after the keyword; one `:` may be skipped
    Name { colon: bool },
    /// After the name or the parameter list
    Header,
    Params(ParamList),
}

#[derive(Debug, Default)]
struct ParamList {
    depth: usize,
    words: usize,
    last: Option<(String, Span)>,
    /// Past a `=` in the current segment
    defaulted: bool,
}

impl ParamList {
    fn open() -> Self {
        Self {
            depth: 1,
            ..Self::default()
        }
    }

    /// End the current segment, returning its parameter name if it has one.
    fn flush(&mut self) -> Option<(String, Span)> {
        let words = std::mem::take(&mut self.words);
        let last = self.last.take();
        self.defaulted = false;
        if words >= 2 { last } else { None }
    }
}

/// Scope and symbol kinds for a declaring keyword, or `None` if its declaration never owns a scope.
fn declaration_kinds(kind: DeclarationKind) -> Option<(ScopeKind, SymbolKind)> {
    match kind {
        DeclarationKind::Namespace => Some((ScopeKind::Namespace, SymbolKind::Namespace)),
        DeclarationKind::Type => Some((ScopeKind::Class, SymbolKind::Type)),
        DeclarationKind::Function => Some((ScopeKind::Function, SymbolKind::Function)),
        DeclarationKind::Variable | DeclarationKind::Import => None,
    }
}

struct Builder<'a> {
    tokens: &'a [Token],
    reusable: HashMap<usize, Arc<Scope>>,
    reused: usize,
    /// `stack[0]` is the module scope
    stack: Vec<Frame>,
    pending: Pending,
    /// Comment bodies since the last significant token
    doc: Vec<String>,
}

impl<'a> Builder<'a> {
    fn new(tokens: &'a [Token], reusable: HashMap<usize, Arc<Scope>>) -> Self {
        Self {
            tokens,
            reusable,
            reused: 0,
            stack: vec![Frame::new(ScopeKind::Module, None, 0)],
            pending: Pending::None,
            doc: Vec::new(),
        }
    }

    fn run(mut self) -> (Arc<Scope>, usize) {
        let tokens = self.tokens;
        let mut i = 0;
        while let Some(token) = tokens.get(i) {
            match token.kind {
                TokenKind::Whitespace => {
                    if token.text.matches('\n').count() >= 2 {
                        self.doc.clear();
                    }
                    i += 1;
                    continue;
                }
                TokenKind::Comment => {
                    self.doc.push(comment_body(&token.text));
                    i += 1;
                    continue;
                }
                _ => {}
            }

            if matches!(self.pending, Pending::None) {
                if let Some(scope) = self.reusable.remove(&token.span.start) {
                    i = self.reattach(scope, token.span.start);
                    continue;
                }
            }

            self.step(token);
            self.doc.clear();
            i += 1;
        }

        let doc_len = tokens.last().map_or(0, |t| t.span.end);
        let reused = self.reused;
        (Arc::new(self.finish(doc_len)), reused)
    }

    fn finish(mut self, doc_len: usize) -> Scope {
        while self.stack.len() > 1 {
            self.close_frame(doc_len, false);
        }
        match self.stack.pop() {
            Some(root) => root.finish(doc_len, true),
            None => Frame::new(ScopeKind::Module, None, 0).finish(doc_len, true),
        }
    }

    // ========================================================================
    // Stack helpers
    // ========================================================================

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn take_doc(&mut self) -> Option<String> {
        let doc = self.doc.join("\n");
        self.doc.clear();
        let doc = doc.trim();
        (!doc.is_empty()).then(|| doc.to_string())
    }

    fn declare(&mut self, name: &str, kind: SymbolKind, span: Span, documentation: Option<String>) {
        let frame = self.top();
        let offset = span.start - frame.start;
        frame.symbols.push(Symbol {
            name: name.to_string(),
            declared_kind: kind,
            offset,
            len: span.len(),
            documentation,
        });
    }

    fn attach_child(&mut self, start: usize, scope: Arc<Scope>) {
        let frame = self.top();
        let offset = start - frame.start;
        frame.children.push(ChildScope { offset, scope });
    }

    fn close_frame(&mut self, end: usize, closed: bool) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let start = frame.start;
            self.attach_child(start, Arc::new(frame.finish(end, closed)));
        }
    }

    /// Attach a previous version's subtree at `start`; returns the index of the first token after it.
    fn reattach(&mut self, scope: Arc<Scope>, start: usize) -> usize {
        let doc = self.take_doc();
        if let Some(declared) = &scope.declared {
            let name_start = start + declared.name_offset;
            let span = Span::new(name_start, name_start + declared.name_len);
            self.declare(&declared.name, declared.kind, span, doc);
        }
        let end = start + scope.len;
        self.attach_child(start, scope);
        self.reused += 1;
        self.tokens.partition_point(|t| t.span.start < end)
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    fn step(&mut self, token: &Token) {
        match std::mem::take(&mut self.pending) {
            Pending::None => self.neutral(token),
            Pending::Binding(binding) => self.binding(binding, token),
            Pending::Decl(decl) => self.declaration(decl, token),
        }
    }

    fn neutral(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Keyword(id) => {
                let Some(kind) = keywords::declares(id) else {
                    return;
                };
                let doc = self.take_doc();
                self.pending = match (kind, declaration_kinds(kind)) {
                    (_, Some((scope_kind, symbol_kind))) => Pending::Decl(PendingDecl {
                        start: token.span.start,
                        scope_kind,
                        symbol_kind,
                        doc,
                        name: None,
                        stage: DeclStage::Name { colon: false },
                        params: Vec::new(),
                    }),
                    (DeclarationKind::Import, None) => Pending::Binding(PendingBinding {
                        kind: SymbolKind::Namespace,
                        doc,
                        typed: false,
                    }),
                    (_, None) => Pending::Binding(PendingBinding {
                        kind: SymbolKind::Variable,
                        doc,
                        typed: false,
                    }),
                };
            }
            TokenKind::Type(_) => {
                let doc = self.take_doc();
                self.pending = Pending::Binding(PendingBinding {
                    kind: SymbolKind::Variable,
                    doc,
                    typed: true,
                });
            }
            TokenKind::Punctuation => match token.text.as_str() {
                "{" => self.stack.push(Frame::new(ScopeKind::Block, None, token.span.start)),
                "}" => self.close_frame(token.span.end, true),
                _ => {}
            },
            _ => {}
        }
    }

    fn binding(&mut self, binding: PendingBinding, token: &Token) {
        match token.kind {
            TokenKind::Identifier => self.declare(&token.text, binding.kind, token.span, binding.doc),
            TokenKind::Type(_) => {
                self.pending = Pending::Binding(PendingBinding { typed: true, ..binding });
            }
            TokenKind::Number if binding.typed => self.pending = Pending::Binding(binding),
            _ if binding.typed && (token.is_punct("[") || token.is_punct("]")) => {
                self.pending = Pending::Binding(binding);
            }
            _ => self.neutral(token),
        }
    }

    fn declaration(&mut self, mut decl: PendingDecl, token: &Token) {
        let punct = (token.kind == TokenKind::Punctuation).then_some(token.text.as_str());
        match punct {
            Some(";") if !matches!(decl.stage, DeclStage::Params(_)) => return,
            Some("}") => return self.close_frame(token.span.end, true),
            Some("{") => {
                if let DeclStage::Params(params) = &mut decl.stage {
                    if let Some(param) = params.flush() {
                        decl.params.push(param);
                    }
                }
                return self.open_declaration(decl);
            }
            _ => {}
        }

        match &mut decl.stage {
            DeclStage::Name { colon } => match (token.kind, punct) {
                (TokenKind::Identifier, _) => {
                    self.declare(&token.text, decl.symbol_kind, token.span, decl.doc.clone());
                    decl.name = Some((token.text.clone(), token.span));
                    decl.stage = DeclStage::Header;
                }
                (_, Some(":")) if !*colon => *colon = true,
                (_, Some("(")) => decl.stage = DeclStage::Params(ParamList::open()),
                // Operator names are punctuation.
                (_, Some(_)) => {}
                _ => return self.neutral(token),
            },
            DeclStage::Header => match (token.kind, punct) {
                (_, Some("(")) => decl.stage = DeclStage::Params(ParamList::open()),
                (TokenKind::Keyword(id), _) if keywords::declares(id).is_some() => return self.neutral(token),
                _ => {}
            },
            DeclStage::Params(params) => match (token.kind, punct) {
                (_, Some("(")) => params.depth += 1,
                (_, Some(")")) if params.depth > 1 => params.depth -= 1,
                (_, Some(")")) => {
                    if let Some(param) = params.flush() {
                        decl.params.push(param);
                    }
                    decl.stage = DeclStage::Header;
                }
                (_, Some("," | ";")) if params.depth == 1 => {
                    if let Some(param) = params.flush() {
                        decl.params.push(param);
                    }
                }
                (_, Some("=")) if params.depth == 1 => params.defaulted = true,
                (TokenKind::Identifier, _) if params.depth == 1 && !params.defaulted => {
                    params.words += 1;
                    params.last = Some((token.text.clone(), token.span));
                }
                (TokenKind::Type(_), _) if params.depth == 1 && !params.defaulted => {
                    params.words += 1;
                    params.last = None;
                }
                _ => {}
            },
        }
        self.pending = Pending::Decl(decl);
    }

    fn open_declaration(&mut self, decl: PendingDecl) {
        let mut frame = Frame::new(decl.scope_kind, decl.name.as_ref().map(|(n, _)| n.clone()), decl.start);
        frame.declared = decl.name.map(|(name, span)| Declared {
            name,
            kind: decl.symbol_kind,
            name_offset: span.start - decl.start,
            name_len: span.len(),
        });
        frame.symbols = decl
            .params
            .into_iter()
            .map(|(name, span)| Symbol {
                name,
                declared_kind: SymbolKind::Variable,
                offset: span.start - decl.start,
                len: span.len(),
                documentation: None,
            })
            .collect();
        self.stack.push(frame);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mu_syntax::lexer::{TextChange, lex, relex};

    fn build(source: &str) -> ScopeTree {
        ScopeTracker::build(&lex(source))
    }

    fn names(tree: &ScopeTree, id: ScopeId) -> Vec<(String, SymbolKind)> {
        tree.get(id)
            .unwrap()
            .symbols()
            .map(|(s, _)| (s.name.clone(), s.declared_kind))
            .collect()
    }

    /// Apply an edit incrementally and check the result against a from-scratch build.
    fn update(source: &str, start: usize, end: usize, insert: &str) -> (ScopeTree, ScopeTree) {
        let mut tokens = lex(source);
        let old = ScopeTracker::build(&tokens);
        let new_text = format!("{}{}{}", &source[..start], insert, &source[end..]);
        let change = TextChange::new(start, end, start + insert.len());
        let relexed = relex(&mut tokens, &new_text, change, Span::new(start, end));
        let updated = ScopeTracker::update(&old, &tokens, relexed.old, change.delta());
        let fresh = build(&new_text);
        assert_eq!(updated, fresh, "edit {start}..{end} -> {insert:?}");
        (old, updated)
    }

    #[test]
    fn test_empty_document() {
        let tree = build("");
        assert_eq!(tree.len(), 1);
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.kind(), ScopeKind::Module);
        assert_eq!(root.span(), Span::new(0, 0));
        assert_eq!(tree.innermost_at(0), ScopeId::ROOT);
    }

    #[test]
    fn test_class_with_method_and_params() {
        let source = "class: Foo {\n  method: bar (int; int a, float b) { let x = a; }\n}";
        let tree = build(source);
        assert_eq!(names(&tree, ScopeId::ROOT), vec![("Foo".to_string(), SymbolKind::Type)]);

        let class = tree.get(tree.root()).unwrap().children()[0];
        let class_entry = tree.get(class).unwrap();
        assert_eq!(class_entry.kind(), ScopeKind::Class);
        assert_eq!(class_entry.name(), Some("Foo"));
        assert_eq!(class_entry.span(), Span::new(0, source.len()));
        assert_eq!(names(&tree, class), vec![("bar".to_string(), SymbolKind::Function)]);

        let method = class_entry.children()[0];
        assert_eq!(tree.get(method).unwrap().kind(), ScopeKind::Function);
        assert_eq!(tree.parent(method), Some(class));
        assert_eq!(
            names(&tree, method),
            vec![
                ("a".to_string(), SymbolKind::Variable),
                ("b".to_string(), SymbolKind::Variable),
                ("x".to_string(), SymbolKind::Variable),
            ]
        );
        let block_children = tree.get(method).unwrap().children();
        assert!(block_children.is_empty());
    }

    #[test]
    fn test_function_body_symbols_live_in_function_scope() {
        let tree = build("function foo() { var ba }");
        let function = tree.innermost_at(22);
        assert_eq!(tree.get(function).unwrap().kind(), ScopeKind::Function);
        assert_eq!(names(&tree, function), vec![("ba".to_string(), SymbolKind::Variable)]);
        assert_eq!(names(&tree, ScopeId::ROOT), vec![("foo".to_string(), SymbolKind::Function)]);
    }

    #[test]
    fn test_return_type_segment_is_not_a_parameter() {
        let tree = build("function: f (Frame; Frame input, string s = name, vector float[3] v) {}");
        let function = tree.get(tree.root()).unwrap().children()[0];
        let params: Vec<String> = names(&tree, function).into_iter().map(|(n, _)| n).collect();
        assert_eq!(params, vec!["input", "s", "v"]);
    }

    #[test]
    fn test_bindings_and_imports() {
        let tree = build("require io;\nuse commands;\nglobal int count = 0;\nconst x = 1;\nfloat[] weights;");
        assert_eq!(
            names(&tree, ScopeId::ROOT),
            vec![
                ("io".to_string(), SymbolKind::Namespace),
                ("commands".to_string(), SymbolKind::Namespace),
                ("count".to_string(), SymbolKind::Variable),
                ("x".to_string(), SymbolKind::Variable),
                ("weights".to_string(), SymbolKind::Variable),
            ]
        );
    }

    #[test]
    fn test_forward_declaration_does_not_open_scope() {
        let tree = build("function: f (int; int a);\nlet y = 2;");
        assert_eq!(tree.len(), 1);
        let root_names: Vec<String> = names(&tree, ScopeId::ROOT).into_iter().map(|(n, _)| n).collect();
        assert_eq!(root_names, vec!["f", "y"]);
    }

    #[test]
    fn test_documentation_from_preceding_comments() {
        let source = "// Adds numbers.\n// Returns the sum.\nfunction: add (int; int a, int b) { return a + b; }\n\n// detached\n\nlet z = 1;";
        let tree = build(source);
        let symbols: Vec<(String, Option<String>)> = tree
            .get(tree.root())
            .unwrap()
            .symbols()
            .map(|(s, _)| (s.name.clone(), s.documentation.clone()))
            .collect();
        assert_eq!(
            symbols,
            vec![
                ("add".to_string(), Some("Adds numbers.\nReturns the sum.".to_string())),
                ("z".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_nested_blocks_and_containment() {
        let source = "{ let a = 1; { let b = 2; } }";
        let tree = build(source);
        let outer = tree.innermost_at(2);
        let inner = tree.innermost_at(16);
        assert_eq!(tree.get(outer).unwrap().kind(), ScopeKind::Block);
        assert_eq!(tree.parent(inner), Some(outer));
        assert_eq!(tree.chain_at(16), vec![inner, outer, ScopeId::ROOT]);
        // On the opening brace and after the closing brace the cursor is outside.
        assert_eq!(tree.innermost_at(0), ScopeId::ROOT);
        assert_eq!(tree.innermost_at(source.len()), ScopeId::ROOT);
    }

    #[test]
    fn test_visible_symbols_innermost_first() {
        let source = "let x = 1;\nfunction: f (int; int x) { let y = x; }";
        let tree = build(source);
        let offset = source.find("let y").unwrap();
        let visible: Vec<(&str, usize)> = tree
            .visible_symbols(offset)
            .iter()
            .map(|v| (v.symbol.name.as_str(), v.distance))
            .collect();
        assert_eq!(visible, vec![("x", 0), ("y", 0), ("x", 1), ("f", 1)]);
        let first = tree.visible_symbols(offset)[0];
        assert_eq!(first.origin_scope, tree.innermost_at(offset));
        assert_eq!(&source[first.span.start..first.span.end], "x");
    }

    #[test]
    fn test_unbalanced_input_closes_synthetically() {
        let source = "class Foo { function bar(";
        let tree = build(source);
        let class = tree.get(tree.root()).unwrap().children()[0];
        let entry = tree.get(class).unwrap();
        assert!(!entry.is_closed());
        assert_eq!(entry.span().end, source.len());
        assert_eq!(tree.innermost_at(source.len()), class);
        assert_eq!(names(&tree, class), vec![("bar".to_string(), SymbolKind::Function)]);
    }

    #[test]
    fn test_stray_closing_brace_is_ignored() {
        let tree = build("} let a = 1; }");
        assert_eq!(tree.len(), 1);
        assert_eq!(names(&tree, ScopeId::ROOT).len(), 1);
    }

    #[test]
    fn test_completing_unbalanced_text_matches_direct_parse() {
        let source = "class Foo { function bar(";
        update(source, source.len(), source.len(), ")}");
    }

    #[test]
    fn test_builder_counts_reattached_subtrees() {
        let source = "function: a (void;) { let x = 1; }\nfunction: b (void;) { let y = 2; }\nfunction: c (void;) { let z = 3; }";
        let pos = source.find("let y").unwrap() + 5;
        let mut tokens = lex(source);
        let old = ScopeTracker::build(&tokens);
        let new_text = format!("{}y{}", &source[..pos], &source[pos..]);
        let change = TextChange::new(pos, pos, pos + 1);
        let relexed = relex(&mut tokens, &new_text, change, Span::new(pos, pos));

        let reusable = collect_reusable(&old, relexed.old, change.delta());
        assert_eq!(reusable.len(), 2);
        let (root, reused) = Builder::new(&tokens, reusable).run();
        assert_eq!(reused, 2);
        assert_eq!(ScopeTree::from_root(root), build(&new_text));

        let (_, reused) = Builder::new(&tokens, HashMap::new()).run();
        assert_eq!(reused, 0);
    }

    #[test]
    fn test_edit_inside_function_reuses_siblings() {
        let source = "function: a (void;) { let x = 1; }\nfunction: b (void;) { let y = 2; }\nfunction: c (void;) { let z = 3; }";
        let pos = source.find("let y").unwrap() + 5;
        let (old, new) = update(source, pos, pos, "y");

        let old_children = old.get(old.root()).unwrap().children().to_vec();
        let new_children = new.get(new.root()).unwrap().children().to_vec();
        let shared = |i: usize| {
            Arc::ptr_eq(
                old.get(old_children[i]).unwrap().node(),
                new.get(new_children[i]).unwrap().node(),
            )
        };
        assert!(shared(0));
        assert!(!shared(1));
        assert!(shared(2));
        assert_eq!(
            new.get(new_children[2]).unwrap().span().start,
            old.get(old_children[2]).unwrap().span().start + 1
        );
    }

    #[test]
    fn test_unclosed_scopes_are_rebuilt() {
        let source = "class A { let x = 1;\nlet y = 2;";
        let (old, new) = update(source, source.len(), source.len(), " }");
        let old_class = old.get(old.root()).unwrap().children()[0];
        let new_class = new.get(new.root()).unwrap().children()[0];
        assert!(!old.get(old_class).unwrap().is_closed());
        assert!(new.get(new_class).unwrap().is_closed());
    }

    #[test]
    fn test_incremental_updates_match_fresh_builds() {
        let source = "// doc\nclass: A {\n  method: m (int; int a) { let b = a; }\n}\n{ let q = 1; }\nfunction: f (void;) { }";
        update(source, 0, 0, "// more\n");
        update(source, 0, 6, "");
        update(source, 7, 7, "let w = 2;\n");
        update(source, source.find("{ let q").unwrap(), source.find("{ let q").unwrap() + 1, "");
        update(source, source.len() - 1, source.len(), "");
        update(source, source.find("let b").unwrap(), source.find("let b").unwrap() + 3, "int");
        update(source, source.find("A {").unwrap(), source.find("A {").unwrap() + 1, "Alpha");
        update(source, 0, source.len(), "");
    }

    #[test]
    fn test_reattached_scope_picks_up_new_documentation() {
        let source = "let a = 1;\n\nfunction: f (void;) { let b = 2; }";
        let (_, new) = update(source, 12, 12, "// Does f.\n");
        let symbols: Vec<Option<String>> = new
            .get(new.root())
            .unwrap()
            .symbols()
            .map(|(s, _)| s.documentation.clone())
            .collect();
        assert_eq!(symbols, vec![None, Some("Does f.".to_string())]);
    }

    #[test]
    fn test_render_outline() {
        let tree = build("class Foo {\n  function bar (int; int a) { }\n}\n{ let x = 1;");
        let expected = "\
module 0..58
  - type Foo @6
  class Foo 0..45
    - function bar @23
    function bar 14..43
      - variable a @37
  block 46..58 (unclosed)
    - variable x @52
";
        assert_eq!(tree.render(), expected);
    }
}
