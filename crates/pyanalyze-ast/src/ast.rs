//! The parse tree itself: a single flat arena of nodes addressed by
//! `NodeId`, mirroring the `NodeIndex`-into-arena shape the checker expects
//! from its node-id'd tree. Statements and expressions share
//! one id space so a diagnostic or hover query can always resolve "the node
//! at this id" without knowing in advance which kind it is.

use pyanalyze_common::Span;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

#[derive(Clone, Debug)]
pub enum Node {
    Stmt(Stmt),
    Expr(Expr),
}

/// Owns every node in a parsed module plus parent links, so callers can walk
/// upward from a leaf (e.g. to find the enclosing function for a return-type
/// check) without the parser threading parent pointers through construction.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    parents: Vec<NodeId>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::Stmt(stmt));
        self.parents.push(parent);
        id
    }

    pub fn alloc_expr(&mut self, expr: Expr, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::Expr(expr));
        self.parents.push(parent);
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn stmt(&self, id: NodeId) -> &Stmt {
        match self.get(id) {
            Node::Stmt(s) => s,
            Node::Expr(_) => panic!("node {id:?} is an expression, not a statement"),
        }
    }

    #[must_use]
    pub fn expr(&self, id: NodeId) -> &Expr {
        match self.get(id) {
            Node::Expr(e) => e,
            Node::Stmt(_) => panic!("node {id:?} is a statement, not an expression"),
        }
    }

    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let p = self.parents[id.0 as usize];
        if p == NodeId::DUMMY {
            None
        } else {
            Some(p)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Module {
    pub arena: Arena,
    pub body: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub annotation: Option<NodeId>,
    pub default: Option<NodeId>,
    pub kind: ParamKind,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Positional,
    /// Introduced by a bare `*` or `*args` marker: everything after is
    /// keyword-only.
    KeywordOnly,
    VarArgs,
    VarKeyword,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    FunctionDef {
        name: String,
        params: Vec<Param>,
        returns: Option<NodeId>,
        body: Vec<NodeId>,
        decorators: Vec<NodeId>,
        is_async: bool,
    },
    ClassDef {
        name: String,
        bases: Vec<NodeId>,
        keywords: Vec<(String, NodeId)>,
        body: Vec<NodeId>,
        decorators: Vec<NodeId>,
    },
    Return(Option<NodeId>),
    Delete(Vec<NodeId>),
    Assign {
        targets: Vec<NodeId>,
        value: NodeId,
    },
    AugAssign {
        target: NodeId,
        op: BinOp,
        value: NodeId,
    },
    AnnAssign {
        target: NodeId,
        annotation: NodeId,
        value: Option<NodeId>,
    },
    For {
        target: NodeId,
        iter: NodeId,
        body: Vec<NodeId>,
        or_else: Vec<NodeId>,
        is_async: bool,
    },
    While {
        test: NodeId,
        body: Vec<NodeId>,
        or_else: Vec<NodeId>,
    },
    If {
        test: NodeId,
        body: Vec<NodeId>,
        or_else: Vec<NodeId>,
    },
    With {
        items: Vec<(NodeId, Option<NodeId>)>,
        body: Vec<NodeId>,
        is_async: bool,
    },
    Raise {
        exc: Option<NodeId>,
        cause: Option<NodeId>,
    },
    Try {
        body: Vec<NodeId>,
        handlers: Vec<ExceptHandler>,
        or_else: Vec<NodeId>,
        finally: Vec<NodeId>,
    },
    Assert {
        test: NodeId,
        msg: Option<NodeId>,
    },
    Import(Vec<(String, Option<String>)>),
    ImportFrom {
        module: Option<String>,
        names: Vec<(String, Option<String>)>,
        level: u32,
    },
    Global(Vec<String>),
    Nonlocal(Vec<String>),
    Expr(NodeId),
    Pass,
    Break,
    Continue,
}

#[derive(Clone, Debug)]
pub struct ExceptHandler {
    pub kind: Option<NodeId>,
    pub name: Option<String>,
    pub body: Vec<NodeId>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Name(String),
    Constant(Constant),
    /// The `x := value` walrus operator.
    NamedExpr {
        target: String,
        value: NodeId,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<NodeId>,
    },
    BinOp {
        left: NodeId,
        op: BinOp,
        right: NodeId,
    },
    UnaryOp {
        op: UnaryOp,
        operand: NodeId,
    },
    Lambda {
        params: Vec<Param>,
        body: NodeId,
    },
    IfExp {
        test: NodeId,
        body: NodeId,
        or_else: NodeId,
    },
    Dict {
        keys: Vec<Option<NodeId>>,
        values: Vec<NodeId>,
    },
    Set(Vec<NodeId>),
    List(Vec<NodeId>),
    Tuple(Vec<NodeId>),
    /// Chained comparisons (`a < b < c`) keep every operand and operator so
    /// narrowing can see each pairwise comparison.
    Compare {
        left: NodeId,
        ops: SmallVec<[CmpOp; 2]>,
        comparators: SmallVec<[NodeId; 2]>,
    },
    Call {
        func: NodeId,
        args: Vec<NodeId>,
        keywords: Vec<(Option<String>, NodeId)>,
    },
    Attribute {
        value: NodeId,
        attr: String,
    },
    Subscript {
        value: NodeId,
        index: NodeId,
    },
    Starred(NodeId),
    Await(NodeId),
    Yield(Option<NodeId>),
    YieldFrom(NodeId),
    ListComp {
        element: NodeId,
        generators: Vec<Comprehension>,
    },
    SetComp {
        element: NodeId,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: NodeId,
        value: NodeId,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        element: NodeId,
        generators: Vec<Comprehension>,
    },
    Ellipsis,
}

#[derive(Clone, Debug)]
pub struct Comprehension {
    pub target: NodeId,
    pub iter: NodeId,
    pub ifs: Vec<NodeId>,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Invert,
    UAdd,
    USub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}
