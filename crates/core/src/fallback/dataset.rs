//! Static titles served when no provider answers.

pub(super) struct MockTitle {
    pub id: &'static str,
    pub name: &'static str,
    pub year: u32,
    pub rating: f32,
    pub runtime: &'static str,
    pub genres: &'static [&'static str],
    pub director: &'static [&'static str],
    pub cast: &'static [&'static str],
    pub description: &'static str,
}

pub(super) const MOVIES: &[MockTitle] = &[
    MockTitle {
        id: "tt0111161",
        name: "The Shawshank Redemption",
        year: 1994,
        rating: 9.3,
        runtime: "142 min",
        genres: &["Drama"],
        director: &["Frank Darabont"],
        cast: &["Tim Robbins", "Morgan Freeman"],
        description: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
    },
    MockTitle {
        id: "tt0068646",
        name: "The Godfather",
        year: 1972,
        rating: 9.2,
        runtime: "175 min",
        genres: &["Crime", "Drama"],
        director: &["Francis Ford Coppola"],
        cast: &["Marlon Brando", "Al Pacino"],
        description: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
    },
    MockTitle {
        id: "tt0468569",
        name: "The Dark Knight",
        year: 2008,
        rating: 9.0,
        runtime: "152 min",
        genres: &["Action", "Crime", "Drama"],
        director: &["Christopher Nolan"],
        cast: &["Christian Bale", "Heath Ledger"],
        description: "Batman faces the Joker, a criminal mastermind who plunges Gotham into anarchy.",
    },
    MockTitle {
        id: "tt0137523",
        name: "Fight Club",
        year: 1999,
        rating: 8.8,
        runtime: "139 min",
        genres: &["Drama"],
        director: &["David Fincher"],
        cast: &["Brad Pitt", "Edward Norton"],
        description: "An insomniac office worker and a soap maker form an underground fight club that evolves into much more.",
    },
    MockTitle {
        id: "tt0109830",
        name: "Forrest Gump",
        year: 1994,
        rating: 8.8,
        runtime: "142 min",
        genres: &["Drama", "Romance"],
        director: &["Robert Zemeckis"],
        cast: &["Tom Hanks", "Robin Wright"],
        description: "Decades of American history unfold through the eyes of a kind man from Alabama.",
    },
    MockTitle {
        id: "tt1375666",
        name: "Inception",
        year: 2010,
        rating: 8.8,
        runtime: "148 min",
        genres: &["Action", "Adventure", "Sci-Fi"],
        director: &["Christopher Nolan"],
        cast: &["Leonardo DiCaprio", "Joseph Gordon-Levitt"],
        description: "A thief who steals corporate secrets through dream-sharing technology is given the inverse task of planting an idea.",
    },
    MockTitle {
        id: "tt0133093",
        name: "The Matrix",
        year: 1999,
        rating: 8.7,
        runtime: "136 min",
        genres: &["Action", "Sci-Fi"],
        director: &["Lana Wachowski", "Lilly Wachowski"],
        cast: &["Keanu Reeves", "Laurence Fishburne"],
        description: "A computer hacker learns the true nature of his reality and his role in the war against its controllers.",
    },
    MockTitle {
        id: "tt0816692",
        name: "Interstellar",
        year: 2014,
        rating: 8.7,
        runtime: "169 min",
        genres: &["Adventure", "Drama", "Sci-Fi"],
        director: &["Christopher Nolan"],
        cast: &["Matthew McConaughey", "Anne Hathaway"],
        description: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
    },
    MockTitle {
        id: "tt0110912",
        name: "Pulp Fiction",
        year: 1994,
        rating: 8.9,
        runtime: "154 min",
        genres: &["Crime", "Drama"],
        director: &["Quentin Tarantino"],
        cast: &["John Travolta", "Uma Thurman"],
        description: "The lives of two mob hitmen, a boxer and a pair of diner bandits intertwine in four tales of violence and redemption.",
    },
    MockTitle {
        id: "tt0120737",
        name: "The Lord of the Rings: The Fellowship of the Ring",
        year: 2001,
        rating: 8.8,
        runtime: "178 min",
        genres: &["Adventure", "Drama", "Fantasy"],
        director: &["Peter Jackson"],
        cast: &["Elijah Wood", "Ian McKellen"],
        description: "A meek Hobbit and eight companions set out to destroy the powerful One Ring.",
    },
];

pub(super) const SERIES: &[MockTitle] = &[
    MockTitle {
        id: "tt0903747",
        name: "Breaking Bad",
        year: 2008,
        rating: 9.5,
        runtime: "49 min",
        genres: &["Crime", "Drama", "Thriller"],
        director: &["Vince Gilligan"],
        cast: &["Bryan Cranston", "Aaron Paul"],
        description: "A chemistry teacher diagnosed with cancer turns to manufacturing methamphetamine to secure his family's future.",
    },
    MockTitle {
        id: "tt0944947",
        name: "Game of Thrones",
        year: 2011,
        rating: 9.2,
        runtime: "57 min",
        genres: &["Action", "Adventure", "Drama"],
        director: &["David Benioff", "D. B. Weiss"],
        cast: &["Emilia Clarke", "Peter Dinklage"],
        description: "Nine noble families fight for control over the lands of Westeros while an ancient enemy returns.",
    },
    MockTitle {
        id: "tt4574334",
        name: "Stranger Things",
        year: 2016,
        rating: 8.7,
        runtime: "51 min",
        genres: &["Drama", "Fantasy", "Horror"],
        director: &["Matt Duffer", "Ross Duffer"],
        cast: &["Millie Bobby Brown", "Winona Ryder"],
        description: "When a young boy vanishes, a small town uncovers a mystery involving secret experiments and supernatural forces.",
    },
    MockTitle {
        id: "tt0108778",
        name: "Friends",
        year: 1994,
        rating: 8.9,
        runtime: "22 min",
        genres: &["Comedy", "Romance"],
        director: &["David Crane", "Marta Kauffman"],
        cast: &["Jennifer Aniston", "Matthew Perry"],
        description: "Follows the personal and professional lives of six friends living in Manhattan.",
    },
    MockTitle {
        id: "tt0386676",
        name: "The Office",
        year: 2005,
        rating: 9.0,
        runtime: "22 min",
        genres: &["Comedy"],
        director: &["Greg Daniels"],
        cast: &["Steve Carell", "Rainn Wilson"],
        description: "A mockumentary on a group of typical office workers at a paper company.",
    },
    MockTitle {
        id: "tt2861424",
        name: "Rick and Morty",
        year: 2013,
        rating: 9.1,
        runtime: "23 min",
        genres: &["Animation", "Adventure", "Comedy"],
        director: &["Justin Roiland", "Dan Harmon"],
        cast: &["Justin Roiland", "Chris Parnell"],
        description: "An alcoholic scientist drags his grandson on dangerous interdimensional adventures.",
    },
    MockTitle {
        id: "tt0475784",
        name: "Westworld",
        year: 2016,
        rating: 8.5,
        runtime: "62 min",
        genres: &["Drama", "Mystery", "Sci-Fi"],
        director: &["Jonathan Nolan", "Lisa Joy"],
        cast: &["Evan Rachel Wood", "Jeffrey Wright"],
        description: "In a futuristic theme park, artificial hosts begin to question the nature of their reality.",
    },
    MockTitle {
        id: "tt1475582",
        name: "Sherlock",
        year: 2010,
        rating: 9.1,
        runtime: "88 min",
        genres: &["Crime", "Drama", "Mystery"],
        director: &["Mark Gatiss", "Steven Moffat"],
        cast: &["Benedict Cumberbatch", "Martin Freeman"],
        description: "A modern update finds the famous sleuth and his doctor partner solving crime in 21st century London.",
    },
    MockTitle {
        id: "tt7366338",
        name: "Chernobyl",
        year: 2019,
        rating: 9.3,
        runtime: "66 min",
        genres: &["Drama", "History", "Thriller"],
        director: &["Johan Renck"],
        cast: &["Jared Harris", "Stellan Skarsgard"],
        description: "The story of the 1986 nuclear accident and the people who sacrificed to save Europe from disaster.",
    },
    MockTitle {
        id: "tt5491994",
        name: "Planet Earth II",
        year: 2016,
        rating: 9.4,
        runtime: "60 min",
        genres: &["Documentary"],
        director: &["Justin Anderson"],
        cast: &["David Attenborough"],
        description: "Wildlife documentary exploring the planet's most extraordinary habitats.",
    },
];
