//! Static copy shown on the page.

pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub highlights: &'static str,
}

pub struct ContactLine {
    pub label: &'static str,
    pub value: &'static str,
}

pub const NAME: &str = "Deony Diras";
pub const TAGLINE: &str = "3D Full Stack Developer";
pub const SCROLL_HINT: &str = "Scroll down";

pub const ABOUT_HEADING: &str = "About Me";
pub const ABOUT_PARAGRAPHS: [&str; 4] = [
    "Hi! I'm Deony Diras, a passionate 3D Full Stack Developer. I specialize in building \
     dynamic web applications and interactive 3D experiences, combining both creativity and \
     technical expertise.",
    "I have hands-on experience with Git, AWS, MySQL, Postgres, API development, and modern \
     web stacks including React.js, Three.js, React Three Fiber (R3F), Vue.js, the TALL Stack \
     (Tailwind, Alpine.js, Laravel, Livewire). I prioritize clean coding practices to create \
     scalable, maintainable, and high-quality applications.",
    "Beyond coding, I also have experience handling projects and leading teams, ensuring \
     collaboration and delivering projects on time while maintaining technical excellence.",
    "Beyond coding, I'm passionate about exploring new 3D techniques, experimenting with \
     animations, and crafting immersive digital experiences that delight users and elevate \
     projects.",
];

pub const PROJECTS_HEADING: &str = "Projects";
pub const PROJECTS: [Project; 3] = [
    Project {
        title: "3D Interactive Portfolio",
        description: "Built using React Three Fiber (R3F), Three.js, and React.js to create a \
                      dynamic 3D experience. Features smooth animations, floating 3D models, \
                      and responsive design.",
        highlights: "Highlights: Interactive 3D astronaut, Scroll-triggered animations, \
                     Floating effects, and immersive UI.",
    },
    Project {
        title: "Full Stack Business App ( In Progress )",
        description: "Developed with Laravel, Vue.js, and Postgres/MySQL. Includes dynamic \
                      dashboards, multi-tenant database support, and RESTful APIs.",
        highlights: "Highlights: Clean code architecture, responsive design, multi-database \
                     handling, and secure user management.",
    },
    Project {
        title: "Home Planner ( Coming Soon)",
        description: "A web-based application for planning and visualizing home layouts. \
                      Built with React.js, R3F, Three.js for interactive 3D room layouts and \
                      MySQL/Postgres for data management.",
        highlights: "Highlights: Interactive furniture placement, 3D room visualization, \
                     responsive design, and smooth user interactions.",
    },
];

pub const CONTACT_HEADING: &str = "Contact Me";
pub const CONTACT_INVITATION: &str = "I'm always open to new projects, collaborations, or a \
                                      chat about web development and 3D experiences.";
pub const CONTACT_LINES: [ContactLine; 2] = [
    ContactLine {
        label: "Email: ",
        value: "deony.diras1998@gmail.com",
    },
    ContactLine {
        label: "Phone: ",
        value: "+63 951 300 3072",
    },
];

pub const LOADING: &str = "Loading...";
